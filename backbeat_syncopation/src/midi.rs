// Note events from Standard MIDI Files.
//
// Reads an SMF with the `midly` crate and turns every sounding NoteOn into a
// quantized `NoteEvent`. All tracks and channels are merged; a NoteOn with
// velocity 0 is a note-off and is skipped. Absolute ticks are rounded to the
// nearest step at `steps_per_quarter` resolution (4 gives the sixteenth grid
// the default weight table expects). Steps beyond the first bar are kept;
// the grid builder decides what to drop.
//
// Only metrical (ticks-per-quarter) timing can be quantized. Timecode files
// are rejected.

use crate::error::{Result, SyncopationError};
use crate::rhythm::NoteEvent;
use midly::{MidiMessage, Smf, Timing, TrackEventKind};
use std::path::Path;

/// Default quantization: sixteenth notes.
pub const STEPS_PER_QUARTER: u32 = 4;

/// Parse an in-memory SMF into note events sorted by (step, pitch).
pub fn parse_note_events(bytes: &[u8], steps_per_quarter: u32) -> Result<Vec<NoteEvent>> {
    if steps_per_quarter == 0 {
        return Err(SyncopationError::InvalidStepsPerQuarter);
    }
    let smf = Smf::parse(bytes)?;
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(ticks) => u64::from(ticks.as_int()),
        Timing::Timecode(..) => return Err(SyncopationError::TimecodeTiming),
    };
    if ticks_per_quarter == 0 {
        return Err(SyncopationError::ZeroTicksPerQuarter);
    }

    let mut events = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        for event in track {
            tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() == 0 {
                    continue;
                }
                let step = quantize_tick(tick, ticks_per_quarter, steps_per_quarter);
                events.push(NoteEvent::new(key.as_int(), step));
            }
        }
    }
    events.sort_by_key(|e| (e.step, e.pitch));

    tracing::debug!(
        tracks = smf.tracks.len(),
        ticks_per_quarter,
        notes = events.len(),
        "parsed MIDI note events"
    );
    Ok(events)
}

/// Read and parse a MIDI file from disk.
pub fn read_note_events(path: &Path, steps_per_quarter: u32) -> Result<Vec<NoteEvent>> {
    let bytes = std::fs::read(path).map_err(|source| SyncopationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_note_events(&bytes, steps_per_quarter)
}

/// Nearest step to `tick`, rounding halves up. Saturates rather than
/// overflowing; such a step lies far outside any bar and gets dropped.
fn quantize_tick(tick: u64, ticks_per_quarter: u64, steps_per_quarter: u32) -> i64 {
    let scaled = tick.saturating_mul(u64::from(steps_per_quarter));
    let step = scaled.saturating_add(ticks_per_quarter / 2) / ticks_per_quarter;
    i64::try_from(step).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::{u4, u7, u15, u28};
    use midly::{Format, Header, TrackEvent};

    const TICKS_PER_QUARTER: u16 = 480;

    /// Build a one-track SMF on channel 10 from (absolute tick, key, velocity).
    fn smf_bytes(notes: &[(u32, u8, u8)]) -> Vec<u8> {
        smf_bytes_with_resolution(TICKS_PER_QUARTER, notes)
    }

    fn smf_bytes_with_resolution(ticks_per_quarter: u16, notes: &[(u32, u8, u8)]) -> Vec<u8> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(ticks_per_quarter)),
        ));
        let mut track = Vec::new();
        let mut last_tick = 0;
        for &(tick, key, vel) in notes {
            track.push(TrackEvent {
                delta: u28::new(tick - last_tick),
                kind: TrackEventKind::Midi {
                    channel: u4::new(9),
                    message: MidiMessage::NoteOn {
                        key: u7::new(key),
                        vel: u7::new(vel),
                    },
                },
            });
            last_tick = tick;
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);

        let mut buf = Vec::new();
        smf.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_quantize_tick() {
        // 480 ticks per quarter, 4 steps per quarter: 120 ticks per step.
        assert_eq!(quantize_tick(0, 480, 4), 0);
        assert_eq!(quantize_tick(120, 480, 4), 1);
        assert_eq!(quantize_tick(59, 480, 4), 0);
        assert_eq!(quantize_tick(60, 480, 4), 1);
        assert_eq!(quantize_tick(1920, 480, 4), 16);
        assert_eq!(quantize_tick(240, 480, 8), 4);
    }

    #[test]
    fn test_quantize_tick_saturates() {
        assert_eq!(quantize_tick(u64::MAX / 2, 480, u32::MAX), i64::MAX);
        assert_eq!(quantize_tick(1 << 40, 1, u32::MAX), i64::MAX);
    }

    #[test]
    fn test_huge_resolution_parses() {
        let bytes = smf_bytes(&[(0, 36, 100), (100_000, 38, 100)]);
        let events = parse_note_events(&bytes, u32::MAX).unwrap();
        assert_eq!(events[0], NoteEvent::new(36, 0));
        assert!(events[1].step > 16);
    }

    #[test]
    fn test_zero_ticks_per_quarter_rejected() {
        let bytes = smf_bytes_with_resolution(0, &[(0, 36, 100)]);
        assert!(matches!(
            parse_note_events(&bytes, STEPS_PER_QUARTER),
            Err(SyncopationError::ZeroTicksPerQuarter)
        ));
    }

    #[test]
    fn test_parse_backbeat() {
        // Kick on 1, snare on 2, with a velocity-0 note-off between.
        let bytes = smf_bytes(&[(0, 36, 100), (100, 36, 0), (480, 38, 90), (482, 42, 70)]);
        let events = parse_note_events(&bytes, STEPS_PER_QUARTER).unwrap();
        assert_eq!(
            events,
            vec![NoteEvent::new(36, 0), NoteEvent::new(38, 4), NoteEvent::new(42, 4)]
        );
    }

    #[test]
    fn test_events_sorted_by_step_then_pitch() {
        let bytes = smf_bytes(&[(0, 42, 80), (0, 36, 80), (1920, 36, 80)]);
        let events = parse_note_events(&bytes, STEPS_PER_QUARTER).unwrap();
        assert_eq!(
            events,
            vec![NoteEvent::new(36, 0), NoteEvent::new(42, 0), NoteEvent::new(36, 16)]
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            parse_note_events(&smf_bytes(&[]), 0),
            Err(SyncopationError::InvalidStepsPerQuarter)
        ));
        assert!(matches!(
            parse_note_events(b"not a midi file", 4),
            Err(SyncopationError::Midi(_))
        ));
    }
}
