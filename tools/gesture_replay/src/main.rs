use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;

#[path = "../../../src/gesture/core.rs"]
mod gesture_core;

use gesture_core::{SurfaceCommand, SwipeEngine, SwipeEngineOutput};

/// Replay a recorded pointer trace through the swipe recognizer and print
/// the resulting surface-command/action stream as CSV.
#[derive(Parser)]
struct Args {
    /// CSV pointer trace (gesture_trace,ms,phase,x,y).
    trace: PathBuf,

    /// Verify the replayed action kinds (tap/swipe_left/swipe_right)
    /// against this file, one kind per line.
    #[arg(long)]
    expect: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TracePhase {
    Down,
    Move,
    Up,
    Click,
}

#[derive(Clone, Copy, Debug)]
struct TraceSample {
    ms: u64,
    phase: TracePhase,
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, Debug)]
struct ReplayLine {
    ms: u64,
    kind: &'static str,
    dx_px: i32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let samples = parse_trace(&args.trace)?;
    let lines = replay(&samples);

    println!("output,ms,kind,dx");
    for line in &lines {
        println!("output,{},{},{}", line.ms, line.kind, line.dx_px);
    }

    if let Some(expect_path) = &args.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<&'static str> = lines
            .iter()
            .filter(|line| is_action_kind(line.kind))
            .map(|line| line.kind)
            .collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("action sequence mismatch");
        }
    }

    Ok(())
}

fn replay(samples: &[TraceSample]) -> Vec<ReplayLine> {
    let mut engine = SwipeEngine::new();
    let mut lines = Vec::new();
    // Same de-duplication the row adapter performs: a click right after a
    // touch contact is the platform echoing the tap, not a second tap.
    let mut touch_used = false;

    for sample in samples {
        match sample.phase {
            TracePhase::Down => {
                touch_used = true;
                push_output(&mut lines, sample.ms, engine.contact_start(sample.x, sample.y, sample.ms));
            }
            TracePhase::Move => {
                push_output(&mut lines, sample.ms, engine.contact_move(sample.x, sample.y));
            }
            TracePhase::Up => {
                push_output(&mut lines, sample.ms, engine.contact_end(sample.ms));
            }
            TracePhase::Click => {
                if touch_used {
                    touch_used = false;
                } else {
                    lines.push(ReplayLine {
                        ms: sample.ms,
                        kind: "tap",
                        dx_px: 0,
                    });
                }
            }
        }
    }

    lines
}

fn push_output(lines: &mut Vec<ReplayLine>, ms: u64, output: SwipeEngineOutput) {
    if let Some(command) = output.command {
        lines.push(match command {
            SurfaceCommand::Track { dx_px } => ReplayLine {
                ms,
                kind: "track",
                dx_px,
            },
            SurfaceCommand::Release => ReplayLine {
                ms,
                kind: "release",
                dx_px: 0,
            },
        });
    }
    if let Some(action) = output.action {
        lines.push(ReplayLine {
            ms,
            kind: action_label(action),
            dx_px: 0,
        });
    }
}

fn action_label(action: gesture_core::SwipeAction) -> &'static str {
    match action {
        gesture_core::SwipeAction::Tap => "tap",
        gesture_core::SwipeAction::SwipeLeft => "swipe_left",
        gesture_core::SwipeAction::SwipeRight => "swipe_right",
    }
}

fn is_action_kind(kind: &str) -> bool {
    matches!(kind, "tap" | "swipe_left" | "swipe_right")
}

fn parse_trace(path: &Path) -> Result<Vec<TraceSample>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == "gesture_trace,ms,phase,x,y" {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() != 5 {
            bail!(
                "{}:{} invalid trace line, expected 5 columns",
                path.display(),
                line_no
            );
        }
        if parts[0].trim() != "gesture_trace" {
            continue;
        }

        let ms: u64 = parse_field(parts[1], path, line_no, "ms")?;
        let phase = match parts[2].trim() {
            "down" => TracePhase::Down,
            "move" => TracePhase::Move,
            "up" => TracePhase::Up,
            "click" => TracePhase::Click,
            other => bail!("{}:{} unknown phase '{other}'", path.display(), line_no),
        };
        let x: i32 = parse_field(parts[3], path, line_no, "x")?;
        let y: i32 = parse_field(parts[4], path, line_no, "y")?;

        out.push(TraceSample { ms, phase, x, y });
    }

    Ok(out)
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        kinds.push(match token.to_ascii_lowercase().as_str() {
            "tap" => "tap",
            "swipe_left" => "swipe_left",
            "swipe_right" => "swipe_right",
            _ => bail!(
                "{}:{} invalid expected action kind: {token}",
                path.display(),
                line_no
            ),
        });
    }

    Ok(kinds)
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    path: &Path,
    line_no: usize,
    field: &str,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        anyhow::anyhow!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw.trim(),
            e
        )
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../traces")
            .join(name)
    }

    fn action_kinds(lines: &[ReplayLine]) -> Vec<&'static str> {
        lines
            .iter()
            .filter(|line| is_action_kind(line.kind))
            .map(|line| line.kind)
            .collect()
    }

    #[test]
    fn parses_trace_with_header_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gesture_trace,ms,phase,x,y").unwrap();
        writeln!(file, "# a tap").unwrap();
        writeln!(file, "gesture_trace,0,down,10,20").unwrap();
        writeln!(file, "gesture_trace,50,up,10,20").unwrap();

        let samples = parse_trace(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].phase, TracePhase::Down);
        assert_eq!(samples[1].ms, 50);
    }

    #[test]
    fn rejects_malformed_phase() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gesture_trace,0,wiggle,10,20").unwrap();

        let err = parse_trace(file.path()).unwrap_err();
        assert!(err.to_string().contains("unknown phase"));
    }

    #[test]
    fn click_after_touch_is_suppressed_in_replay() {
        let samples = [
            TraceSample {
                ms: 0,
                phase: TracePhase::Down,
                x: 0,
                y: 0,
            },
            TraceSample {
                ms: 50,
                phase: TracePhase::Up,
                x: 0,
                y: 0,
            },
            TraceSample {
                ms: 60,
                phase: TracePhase::Click,
                x: 0,
                y: 0,
            },
        ];

        let lines = replay(&samples);
        assert_eq!(action_kinds(&lines), vec!["tap"]);
    }

    #[test]
    fn tap_fixture_replays_to_a_single_tap() {
        let samples = parse_trace(&fixture("tap.csv")).unwrap();
        let lines = replay(&samples);
        assert_eq!(action_kinds(&lines), vec!["tap"]);
    }

    #[test]
    fn swipe_fixtures_replay_to_their_expected_kinds() {
        for (trace, expected) in [
            ("swipe_left_slow.csv", "swipe_left"),
            ("swipe_right_flick.csv", "swipe_right"),
        ] {
            let samples = parse_trace(&fixture(trace)).unwrap();
            let lines = replay(&samples);
            assert_eq!(action_kinds(&lines), vec![expected], "{trace}");
        }
    }

    #[test]
    fn scroll_and_abandoned_drag_fixtures_replay_to_nothing() {
        for trace in ["scroll.csv", "abandoned_drag.csv"] {
            let samples = parse_trace(&fixture(trace)).unwrap();
            let lines = replay(&samples);
            assert!(action_kinds(&lines).is_empty(), "{trace}");
        }
    }
}
