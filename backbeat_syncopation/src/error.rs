// Error type for the syncopation crate.
//
// Two variants are caller configuration errors that the scoring path surfaces
// rather than swallows: an unmapped pitch (the symbolic rhythm would be
// corrupt) and a weight table whose length differs from the grid length (the
// metrical model would be silently changed). Out-of-range event steps are NOT
// errors; `rhythm.rs` drops them with a `tracing::warn!` diagnostic.
//
// The remaining variants belong to the outer surfaces: JSON configuration
// loading (`config.rs`), MIDI input (`midi.rs`) and the CLI flags.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SyncopationError {
    /// A note's pitch has no entry in the instrument map.
    #[error("unknown instrument for pitch {pitch}")]
    UnmappedPitch { pitch: u8 },

    /// The metrical weight table does not cover exactly one grid.
    #[error("metrical weight table has {weights} entries but grid length is {grid_length}")]
    WeightLengthMismatch { weights: usize, grid_length: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("steps per quarter must be positive")]
    InvalidStepsPerQuarter,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unreadable MIDI file: {0}")]
    Midi(#[from] midly::Error),

    /// SMPTE timecode files have no quarter-note grid to quantize against.
    #[error("MIDI file uses timecode timing; only metrical timing can be quantized")]
    TimecodeTiming,

    #[error("malformed MIDI file: header declares zero ticks per quarter note")]
    ZeroTicksPerQuarter,
}

pub type Result<T> = std::result::Result<T, SyncopationError>;
