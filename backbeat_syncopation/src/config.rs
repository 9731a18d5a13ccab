// Configuration tables for syncopation scoring.
//
// `SyncopationConfig` bundles the four inputs besides the note events: the
// grid length, the instrument map, the metrical weights and the instrument
// interaction table. Nothing here is global; every scoring call receives its
// tables explicitly, so alternative bar lengths or instrument vocabularies
// are just another config value.
//
// Configs round-trip through JSON. Missing fields fall back to the 16-step
// drum defaults, so a file may override only the interaction table. A
// loaded config is validated before use: the weight table must match the
// grid length and instrument labels must be joinable into tokens.
//
// See also: `weights.rs`, `instrument.rs`, `interaction.rs` for the default
// tables themselves.

use crate::error::{Result, SyncopationError};
use crate::instrument::InstrumentMap;
use crate::interaction::InteractionTable;
use crate::rhythm::{NoteEvent, RhythmSequence, build_rhythm};
use crate::scoring::{Syncopation, score_rhythm, syncopation_contributions};
use crate::weights::MetricalWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncopationConfig {
    /// Steps per bar. Must equal `weights.len()`.
    pub grid_length: usize,
    pub instruments: InstrumentMap,
    pub weights: MetricalWeights,
    pub interactions: InteractionTable,
}

impl Default for SyncopationConfig {
    fn default() -> Self {
        SyncopationConfig {
            grid_length: 16,
            instruments: InstrumentMap::default_drums(),
            weights: MetricalWeights::sixteen_step(),
            interactions: InteractionTable::default_drums(),
        }
    }
}

impl SyncopationConfig {
    /// 32-step bars with the doubled sixteen-step weight pattern.
    pub fn bar_32() -> Self {
        SyncopationConfig {
            grid_length: 32,
            weights: MetricalWeights::thirty_two_step(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.check_grid_length(self.grid_length)?;
        self.instruments.validate()
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SyncopationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| SyncopationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&data)?;
        tracing::debug!(
            path = %path.display(),
            grid_length = config.grid_length,
            instruments = config.instruments.len(),
            interactions = config.interactions.len(),
            "loaded syncopation config"
        );
        Ok(config)
    }

    pub fn rhythm(&self, events: &[NoteEvent]) -> Result<RhythmSequence> {
        build_rhythm(events, self.grid_length, &self.instruments)
    }

    /// Syncopation index of one bar of events under this config.
    pub fn score(&self, events: &[NoteEvent]) -> Result<i64> {
        score_rhythm(&self.rhythm(events)?, &self.weights, &self.interactions)
    }

    pub fn contributions(&self, rhythm: &RhythmSequence) -> Result<Vec<Syncopation>> {
        syncopation_contributions(rhythm, &self.weights, &self.interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SyncopationConfig::default().validate().is_ok());
        let bar_32 = SyncopationConfig::bar_32();
        assert!(bar_32.validate().is_ok());
        assert_eq!(bar_32.weights.len(), 32);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SyncopationConfig::bar_32();
        let json = config.to_json().unwrap();
        assert_eq!(SyncopationConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "interactions": [{ "prev": "HH", "curr": "BD", "bonus": 3 }] }"#;
        let config = SyncopationConfig::from_json(json).unwrap();
        assert_eq!(config.grid_length, 16);
        assert_eq!(config.instruments, InstrumentMap::default_drums());
        assert_eq!(config.interactions.len(), 1);
        assert_eq!(config.interactions.bonus("HH", "BD"), 3);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let json = r#"{ "grid_length": 32 }"#;
        let err = SyncopationConfig::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SyncopationError::WeightLengthMismatch { weights: 16, grid_length: 32 }
        ));
    }

    #[test]
    fn test_bad_json_and_missing_file() {
        assert!(matches!(
            SyncopationConfig::from_json("{ not json"),
            Err(SyncopationError::Json(_))
        ));
        let err = SyncopationConfig::load(Path::new("/nonexistent/backbeat.json")).unwrap_err();
        assert!(matches!(err, SyncopationError::Io { .. }));
    }

    #[test]
    fn test_custom_vocabulary() {
        let json = r#"{
            "grid_length": 4,
            "instruments": { "60": "LO", "72": "HI" },
            "weights": [0, -2, -1, -2],
            "interactions": [{ "prev": "HI", "curr": "LO", "bonus": 5 }]
        }"#;
        let config = SyncopationConfig::from_json(json).unwrap();
        // LO on step 1 (-2) then HI on 2 (-1): delta 1. LO wraps back to HI: -1.
        let events = [NoteEvent::new(60, 1), NoteEvent::new(72, 2)];
        assert_eq!(config.score(&events).unwrap(), 1);
        // HI on 1 then LO on 2: delta 1 plus bonus 5.
        let events = [NoteEvent::new(72, 1), NoteEvent::new(60, 2)];
        assert_eq!(config.score(&events).unwrap(), 6);
    }
}
