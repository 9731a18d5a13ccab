// Backbeat syncopation index — CLI entry point.
//
// Reads one bar of drum onsets, prints its rhythm grid and syncopation index.
// Input is either a MIDI file or a JSON array of `{ "pitch", "step" }` note
// events (chosen by the `.json` extension).
//
// Usage:
//   cargo run -p backbeat_syncopation -- <input.mid|events.json>
//     [--config tables.json | --bar32] [--steps-per-quarter N] [--json]
//
// Logging goes through tracing; set RUST_LOG=debug for per-onset detail.

use backbeat_syncopation::midi::{STEPS_PER_QUARTER, read_note_events};
use backbeat_syncopation::{NoteEvent, Result, SyncopationConfig, SyncopationError};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Report<'a> {
    rhythm: &'a [String],
    score: i64,
    syncopations: Vec<backbeat_syncopation::scoring::Syncopation>,
    dropped_events: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(input) = args.get(1).filter(|s| !s.starts_with("--")) else {
        eprintln!(
            "Usage: syncopation <input.mid|events.json> [--config PATH | --bar32] \
             [--steps-per-quarter N] [--json]"
        );
        std::process::exit(2);
    };

    if let Err(e) = run(Path::new(input), &args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(input: &Path, args: &[String]) -> Result<()> {
    let config = select_config(args)?;
    let steps_per_quarter =
        parse_flag(args, "--steps-per-quarter")?.unwrap_or(STEPS_PER_QUARTER);

    let events = load_events(input, steps_per_quarter)?;
    let grid = backbeat_syncopation::rhythm::Grid::from_events(&events, config.grid_length);
    let rhythm = grid.to_rhythm(&config.instruments)?;
    let syncopations = config.contributions(&rhythm)?;
    let score = syncopations.iter().map(|s| s.value()).sum();

    if has_flag(args, "--json") {
        let report = Report {
            rhythm: rhythm.tokens(),
            score,
            syncopations,
            dropped_events: grid.dropped,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = grid.stats();
    println!("Input: {}", input.display());
    println!(
        "Grid: {} steps, {} onsets ({} notes, {} dropped)",
        stats.total_steps, stats.onset_steps, stats.total_notes, stats.dropped_events
    );
    println!("Rhythm: {}", rhythm.summary());
    for s in &syncopations {
        println!(
            "  step {:>2} after step {:>2} ({} -> {}): delta {:+}, bonus {:+}",
            s.step,
            s.previous_step,
            rhythm.token(s.previous_step),
            rhythm.token(s.step),
            s.delta,
            s.bonus
        );
    }
    println!("Syncopation index: {score}");
    Ok(())
}

fn load_events(input: &Path, steps_per_quarter: u32) -> Result<Vec<NoteEvent>> {
    let is_json = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return read_note_events(input, steps_per_quarter);
    }
    let data = std::fs::read_to_string(input).map_err(|source| SyncopationError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// A `--config` file fixes its own grid length, so `--bar32` cannot
/// override it.
fn select_config(args: &[String]) -> Result<SyncopationConfig> {
    let bar32 = has_flag(args, "--bar32");
    match parse_flag::<String>(args, "--config")? {
        Some(_) if bar32 => Err(SyncopationError::InvalidArgument(
            "--config and --bar32 cannot be combined".to_string(),
        )),
        Some(path) => SyncopationConfig::load(Path::new(&path)),
        None if bar32 => Ok(SyncopationConfig::bar_32()),
        None => Ok(SyncopationConfig::default()),
    }
}

/// Value following `flag`, or `None` if the flag is absent. A flag given
/// without a value, or with one that does not parse, is an error.
fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args
        .get(i + 1)
        .filter(|v| !v.starts_with("--"))
        .ok_or_else(|| SyncopationError::InvalidArgument(format!("{flag} requires a value")))?;
    value.parse().map(Some).map_err(|_| {
        SyncopationError::InvalidArgument(format!("invalid value {value:?} for {flag}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flag() {
        let a = args(&["syncopation", "in.mid", "--steps-per-quarter", "8"]);
        assert_eq!(parse_flag::<u32>(&a, "--steps-per-quarter").unwrap(), Some(8));
        assert_eq!(parse_flag::<u32>(&a, "--other").unwrap(), None);
    }

    #[test]
    fn test_parse_flag_rejects_bad_value() {
        for bad in ["eight", "-1", "99999999999"] {
            let a = args(&["syncopation", "in.mid", "--steps-per-quarter", bad]);
            let err = parse_flag::<u32>(&a, "--steps-per-quarter").unwrap_err();
            assert!(matches!(err, SyncopationError::InvalidArgument(_)));
            assert!(err.to_string().contains("--steps-per-quarter"));
        }
    }

    #[test]
    fn test_parse_flag_missing_value() {
        let a = args(&["syncopation", "in.mid", "--steps-per-quarter"]);
        assert!(matches!(
            parse_flag::<u32>(&a, "--steps-per-quarter"),
            Err(SyncopationError::InvalidArgument(_))
        ));
        let a = args(&["syncopation", "in.mid", "--config", "--json"]);
        assert!(matches!(
            parse_flag::<String>(&a, "--config"),
            Err(SyncopationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_select_config() {
        assert_eq!(select_config(&args(&["syncopation", "in.mid"])).unwrap().grid_length, 16);
        assert_eq!(
            select_config(&args(&["syncopation", "in.mid", "--bar32"])).unwrap().grid_length,
            32
        );
    }

    #[test]
    fn test_config_and_bar32_conflict() {
        let a = args(&["syncopation", "in.mid", "--config", "tables.json", "--bar32"]);
        let err = select_config(&a).unwrap_err();
        assert!(matches!(err, SyncopationError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "invalid argument: --config and --bar32 cannot be combined"
        );
    }
}
