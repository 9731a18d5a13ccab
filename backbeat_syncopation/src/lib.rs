// Backbeat syncopation index
//
// Scores how syncopated a bar of polyphonic drum onsets is, using a
// metrical-salience model with instrument-pair bonuses. The crate is a pure
// function from quantized note events plus configuration tables to a single
// integer score, with the intermediate symbolic rhythm available for
// inspection. It holds no global state and does no I/O beyond the optional
// loaders, so calls from many threads need no coordination.
//
// Architecture:
// - instrument.rs: Pitch -> instrument label map (GM drum reduction default)
// - weights.rs: Metrical weight table (16-step hierarchy, doubled for 32)
// - interaction.rs: Directional instrument-pair bonus table
// - rhythm.rs: Onset grid and rhythm-token sequence (the grid builder)
// - scoring.rs: Circular nearest-previous-onset syncopation scorer
// - config.rs: Bundled tables, JSON load/save and validation
// - batch.rs: Parallel batch scoring and pairwise score distances
// - midi.rs: Quantized note events from Standard MIDI Files
// - error.rs: Crate error type
//
// Pipeline: note events -> Grid -> RhythmSequence -> score.

pub mod batch;
pub mod config;
pub mod error;
pub mod instrument;
pub mod interaction;
pub mod midi;
pub mod rhythm;
pub mod scoring;
pub mod weights;

pub use config::SyncopationConfig;
pub use error::{Result, SyncopationError};
pub use instrument::InstrumentMap;
pub use interaction::InteractionTable;
pub use rhythm::{NoteEvent, RhythmSequence};
pub use weights::MetricalWeights;

/// Syncopation index of one bar of note events.
///
/// Builds the rhythm sequence from `events` on a `grid_length`-step grid and
/// scores it. Events outside the bar are dropped with a warning. Fails if a
/// pitch is missing from `instruments` or `weights` does not have
/// `grid_length` entries.
pub fn syncopation_index(
    events: &[NoteEvent],
    instruments: &InstrumentMap,
    weights: &MetricalWeights,
    interactions: &InteractionTable,
    grid_length: usize,
) -> Result<i64> {
    let rhythm = rhythm::build_rhythm(events, grid_length, instruments)?;
    scoring::score_rhythm(&rhythm, weights, interactions)
}
