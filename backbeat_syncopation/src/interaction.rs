// Instrument interaction table: extra syncopation for specific onset pairs.
//
// Some instrument successions are heard as more syncopated than their
// metrical positions alone suggest; a kick answered by a snare on a weaker
// step is the classic case. Each entry is keyed by the ordered pair of
// rhythm tokens (preceding onset, current onset). Keys are directional:
// ("BD", "HH") and ("HH", "BD") are independent entries. Pairs absent from
// the table carry no bonus.
//
// Tokens are the canonical sorted, hyphen-joined form produced by
// `rhythm.rs`, so a combined snare + hi-hat onset is keyed as "HH-SD".
//
// In JSON the table is a list of `{ "prev", "curr", "bonus" }` entries, since
// a pair cannot be a JSON object key.

use crate::instrument::{BASS_DRUM, HI_HAT, SNARE_DRUM};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered pair of rhythm tokens: the preceding onset, then the current one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstrumentPair {
    pub prev: String,
    pub curr: String,
}

impl InstrumentPair {
    pub fn new(prev: impl Into<String>, curr: impl Into<String>) -> Self {
        InstrumentPair {
            prev: prev.into(),
            curr: curr.into(),
        }
    }
}

/// Serialized form of one table entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub prev: String,
    pub curr: String,
    pub bonus: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<InteractionEntry>", into = "Vec<InteractionEntry>")]
pub struct InteractionTable {
    bonuses: BTreeMap<InstrumentPair, i32>,
}

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kick/snare successions from polyphonic syncopation studies: a kick
    /// followed by a snare (alone or with hi-hat) weighs heaviest, the
    /// reverse lighter.
    pub fn default_drums() -> Self {
        let snare_with_hat = format!("{HI_HAT}-{SNARE_DRUM}");
        let kick_with_hat = format!("{BASS_DRUM}-{HI_HAT}");

        let mut table = InteractionTable::new();
        table.insert(BASS_DRUM, SNARE_DRUM, 2);
        table.insert(BASS_DRUM, snare_with_hat.as_str(), 2);
        table.insert(kick_with_hat.as_str(), snare_with_hat.as_str(), 2);
        table.insert(SNARE_DRUM, BASS_DRUM, 1);
        table
    }

    /// Set the bonus applied when `curr` follows `prev`. Replaces any
    /// existing entry for that ordered pair.
    pub fn insert(&mut self, prev: impl Into<String>, curr: impl Into<String>, bonus: i32) {
        self.bonuses.insert(InstrumentPair::new(prev, curr), bonus);
    }

    /// Bonus for `curr` following `prev`; 0 when the pair is absent.
    pub fn bonus(&self, prev: &str, curr: &str) -> i32 {
        self.bonuses
            .get(&InstrumentPair::new(prev, curr))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstrumentPair, i32)> {
        self.bonuses.iter().map(|(pair, &bonus)| (pair, bonus))
    }
}

impl From<Vec<InteractionEntry>> for InteractionTable {
    fn from(entries: Vec<InteractionEntry>) -> Self {
        let mut table = InteractionTable::new();
        for entry in entries {
            table.insert(entry.prev, entry.curr, entry.bonus);
        }
        table
    }
}

impl From<InteractionTable> for Vec<InteractionEntry> {
    fn from(table: InteractionTable) -> Self {
        table
            .bonuses
            .into_iter()
            .map(|(pair, bonus)| InteractionEntry {
                prev: pair.prev,
                curr: pair.curr,
                bonus,
            })
            .collect()
    }
}
