// The onset grid and the symbolic rhythm derived from it.
//
// A `Grid` is one bar of quantized steps. Each slot holds the pitches whose
// onset lands exactly on that step; simultaneous onsets share a slot, and a
// pitch repeated on the same step (doubled tracks, flams) is kept once. Events
// outside `[0, num_steps)` are dropped with a warning and counted, never
// wrapped or clamped.
//
// A `RhythmSequence` is the grid rendered through an instrument map: one
// token per step, empty for silence, otherwise the slot's instrument labels
// sorted and joined with `-` ("BD-HH"). Sorting makes the token independent
// of event order. Labels are not deduplicated, so two hi-hat pitches on the
// same step give "HH-HH".
//
// The rhythm sequence is what `scoring.rs` reads; the grid is never scored
// directly.

use crate::error::Result;
use crate::instrument::InstrumentMap;
use serde::{Deserialize, Serialize};

/// Separator between instrument labels within one token.
pub const TOKEN_JOIN: &str = "-";

/// A quantized note onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch; resolved to an instrument through the instrument map.
    pub pitch: u8,
    /// Quantized start step. May be negative or past the bar for events the
    /// grid will drop.
    pub step: i64,
}

impl NoteEvent {
    pub fn new(pitch: u8, step: i64) -> Self {
        NoteEvent { pitch, step }
    }
}

/// One bar of onset slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub num_steps: usize,
    /// Distinct pitches starting on each step, in arrival order.
    pub slots: Vec<Vec<u8>>,
    /// Events rejected because their step fell outside the bar.
    pub dropped: usize,
}

impl Grid {
    /// An empty grid of `num_steps` slots.
    pub fn new(num_steps: usize) -> Self {
        Grid {
            num_steps,
            slots: vec![Vec::new(); num_steps],
            dropped: 0,
        }
    }

    pub fn from_events(events: &[NoteEvent], num_steps: usize) -> Self {
        let mut grid = Grid::new(num_steps);
        for event in events {
            grid.place(event);
        }
        grid
    }

    /// Add an event to its slot. Returns false (and logs) if the step is out
    /// of range. A pitch already present on that step is not added again.
    pub fn place(&mut self, event: &NoteEvent) -> bool {
        match usize::try_from(event.step) {
            Ok(step) if step < self.num_steps => {
                let slot = &mut self.slots[step];
                if !slot.contains(&event.pitch) {
                    slot.push(event.pitch);
                }
                true
            }
            _ => {
                tracing::warn!(
                    step = event.step,
                    grid_length = self.num_steps,
                    pitch = event.pitch,
                    "event step out of range, dropping"
                );
                self.dropped += 1;
                false
            }
        }
    }

    pub fn pitches(&self, step: usize) -> &[u8] {
        &self.slots[step]
    }

    /// Render the grid as instrument tokens. Fails on the first pitch the map
    /// does not know.
    pub fn to_rhythm(&self, instruments: &InstrumentMap) -> Result<RhythmSequence> {
        let tokens = self
            .slots
            .iter()
            .map(|pitches| slot_token(pitches, instruments))
            .collect::<Result<Vec<_>>>()?;
        Ok(RhythmSequence { tokens })
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            total_steps: self.num_steps,
            onset_steps: self.slots.iter().filter(|s| !s.is_empty()).count(),
            total_notes: self.slots.iter().map(Vec::len).sum(),
            dropped_events: self.dropped,
        }
    }
}

/// Statistics about a grid's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStats {
    pub total_steps: usize,
    pub onset_steps: usize,
    pub total_notes: usize,
    pub dropped_events: usize,
}

fn slot_token(pitches: &[u8], instruments: &InstrumentMap) -> Result<String> {
    let mut labels = pitches
        .iter()
        .map(|&pitch| instruments.label(pitch))
        .collect::<Result<Vec<_>>>()?;
    labels.sort_unstable();
    Ok(labels.join(TOKEN_JOIN))
}

/// One token per grid step; an empty token is a step with no onset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RhythmSequence {
    tokens: Vec<String>,
}

impl RhythmSequence {
    /// Build directly from tokens. Tokens are taken as given, so callers
    /// supplying their own must use the canonical sorted form.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RhythmSequence {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, step: usize) -> &str {
        &self.tokens[step]
    }

    pub fn is_onset(&self, step: usize) -> bool {
        !self.tokens[step].is_empty()
    }

    /// Steps holding an onset, in order.
    pub fn onsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.is_empty())
            .map(|(step, _)| step)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Compact one-line view: `.` for silent steps, `|` every beat.
    pub fn summary(&self) -> String {
        let beat_steps = 4; // sixteenth-note grid
        let mut out = String::new();
        for (step, token) in self.tokens.iter().enumerate() {
            if step > 0 {
                out.push(' ');
                if step % beat_steps == 0 {
                    out.push_str("| ");
                }
            }
            if token.is_empty() {
                out.push('.');
            } else {
                out.push_str(token);
            }
        }
        out
    }
}

/// Build the rhythm sequence for one bar of events.
///
/// The result always has exactly `grid_length` tokens. Out-of-range events
/// are dropped with a warning; an unmapped pitch is an error.
pub fn build_rhythm(
    events: &[NoteEvent],
    grid_length: usize,
    instruments: &InstrumentMap,
) -> Result<RhythmSequence> {
    Grid::from_events(events, grid_length).to_rhythm(instruments)
}
