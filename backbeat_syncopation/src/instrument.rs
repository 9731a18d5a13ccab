// Instrument map: pitch -> short instrument label.
//
// The grid builder (`rhythm.rs`) turns each sounding pitch into a label and
// joins the labels of simultaneous onsets into one token ("BD-HH"), so labels
// must never contain the join character. `validate()` enforces that for maps
// loaded from JSON.
//
// The default map covers the General MIDI percussion keys reduced to seven
// labels, the same reduction drum-pattern datasets use for groove models.
// Several GM keys share a label (e.g. open and closed hi-hat are both "HH");
// the builder keeps such duplicates rather than collapsing them.

use crate::error::{Result, SyncopationError};
use crate::rhythm::TOKEN_JOIN;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BASS_DRUM: &str = "BD";
pub const SNARE_DRUM: &str = "SD";
pub const HI_HAT: &str = "HH";
pub const LOW_TOM: &str = "LT";
pub const MID_TOM: &str = "MT";
pub const HIGH_TOM: &str = "HT";
pub const CRASH: &str = "CR";
pub const RIDE: &str = "RD";

/// GM percussion keys and their reduced labels.
const GM_DRUMS: &[(u8, &str)] = &[
    (35, BASS_DRUM), // acoustic bass drum
    (36, BASS_DRUM),
    (37, SNARE_DRUM), // side stick
    (38, SNARE_DRUM),
    (40, SNARE_DRUM), // electric snare
    (42, HI_HAT),     // closed
    (44, HI_HAT),     // pedal
    (46, HI_HAT),     // open
    (41, LOW_TOM),
    (43, LOW_TOM),
    (45, LOW_TOM),
    (47, MID_TOM),
    (48, MID_TOM),
    (50, HIGH_TOM),
    (49, CRASH),
    (52, CRASH), // chinese
    (55, CRASH), // splash
    (57, CRASH),
    (51, RIDE),
    (53, RIDE), // bell
    (59, RIDE),
];

/// Lookup from MIDI pitch to instrument label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentMap {
    labels: BTreeMap<u8, String>,
}

impl InstrumentMap {
    /// An empty map. Every pitch is unmapped until inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reduced General MIDI drum map.
    pub fn default_drums() -> Self {
        GM_DRUMS.iter().copied().collect()
    }

    pub fn insert(&mut self, pitch: u8, label: impl Into<String>) {
        self.labels.insert(pitch, label.into());
    }

    /// Label for `pitch`, or `UnmappedPitch` if the map has no entry.
    pub fn label(&self, pitch: u8) -> Result<&str> {
        self.labels
            .get(&pitch)
            .map(String::as_str)
            .ok_or(SyncopationError::UnmappedPitch { pitch })
    }

    pub fn contains(&self, pitch: u8) -> bool {
        self.labels.contains_key(&pitch)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.labels.iter().map(|(&pitch, label)| (pitch, label.as_str()))
    }

    /// Reject labels that would make tokens ambiguous once joined.
    pub fn validate(&self) -> Result<()> {
        for (pitch, label) in self.iter() {
            if label.is_empty() {
                return Err(SyncopationError::InvalidConfig(format!(
                    "pitch {pitch} has an empty instrument label"
                )));
            }
            if label.contains(TOKEN_JOIN) || label.chars().any(char::is_whitespace) {
                return Err(SyncopationError::InvalidConfig(format!(
                    "instrument label {label:?} for pitch {pitch} may not contain \
                     {TOKEN_JOIN:?} or whitespace"
                )));
            }
        }
        Ok(())
    }
}

impl<L: Into<String>> FromIterator<(u8, L)> for InstrumentMap {
    fn from_iter<I: IntoIterator<Item = (u8, L)>>(iter: I) -> Self {
        InstrumentMap {
            labels: iter.into_iter().map(|(pitch, label)| (pitch, label.into())).collect(),
        }
    }
}
