//! Runs the `kbar` binary against temporary config and observation files.

mod common;
use common::trading_day_rows;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::{fs, str};

use tempfile::TempDir;

const CONFIG: &str = r#"
symbol = " 2330 "
timezone = "Asia/Taipei"

[range]
start = "2022-01-03"
end = "2022-01-12"

[aggregation]
duration = "1D"

[[indicators]]
kind = "ma"
window = 3

[[indicators]]
kind = "rsi"
period = 2

[[indicators]]
kind = "ma"
window = 3
"#;

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
    input: PathBuf,
}

fn fixture() -> Result<Fixture, Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let config = dir.path().join("kbar.toml");
    let input = dir.path().join("kbars_2330.json");
    fs::write(&config, CONFIG)?;
    fs::write(&input, trading_day_rows())?;
    Ok(Fixture {
        _dir: dir,
        config,
        input,
    })
}

fn kbar(args: &[&str]) -> std::io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_kbar"))
        .args(args)
        .env("KBAR_LOG", "warn")
        .output()
}

fn path(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

fn run_json(f: &Fixture, extra: &[&str]) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut args = vec!["run", "--config", path(&f.config), "--input", path(&f.input), "--format", "json"];
    args.extend_from_slice(extra);
    let output = kbar(&args)?;
    if !output.status.success() {
        eprintln!("stderr: {}", str::from_utf8(&output.stderr)?);
    }
    assert!(output.status.success(), "kbar run did not exit successfully");
    Ok(serde_json::from_str(str::from_utf8(&output.stdout)?)?)
}

fn bar_count(report: &serde_json::Value) -> usize {
    report["series"]["bars"].as_array().map_or(0, Vec::len)
}

#[test]
fn run_prints_table_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let output = kbar(&["run", "--config", path(&f.config), "--input", path(&f.input)])?;
    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "2330 1D (8 bars from 16 observations)");
    assert!(lines[1].contains("MA(3)") && lines[1].contains("RSI(2)"));
    assert_eq!(lines.len(), 2 + 8);
    Ok(())
}

#[test]
fn json_output_matches_config() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let report = run_json(&f, &[])?;
    assert_eq!(bar_count(&report), 8);
    assert_eq!(report["series"]["symbol"], "2330");
    let labels: Vec<&String> = report["indicators"].as_object().unwrap().keys().collect();
    assert_eq!(labels, ["MA(3)", "RSI(2)"]);
    Ok(())
}

#[test]
fn duration_override_shrinks_bar_count() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let daily = run_json(&f, &[])?;
    let weekly = run_json(&f, &["--duration", "1W"])?;
    assert!(bar_count(&weekly) < bar_count(&daily));
    assert_eq!(bar_count(&weekly), 2);
    assert_eq!(weekly["series"]["duration"], "1W");
    Ok(())
}

#[test]
fn start_override_narrows_range() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let report = run_json(&f, &["--start", "2022-01-10"])?;
    // Jan 10, 11, 12; the configured end still applies
    assert_eq!(bar_count(&report), 3);
    assert_eq!(report["observations_used"], 6);
    Ok(())
}

#[test]
fn inverted_range_override_fails_with_message() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let output = kbar(&[
        "run",
        "--config",
        path(&f.config),
        "--input",
        path(&f.input),
        "--start",
        "2022-01-10",
        "--end",
        "2022-01-05",
    ])?;
    assert!(!output.status.success());
    let stderr = str::from_utf8(&output.stderr)?;
    assert!(stderr.contains("is after end"), "unexpected stderr: {stderr}");
    Ok(())
}

#[test]
fn bad_duration_is_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let output = kbar(&[
        "run",
        "--config",
        path(&f.config),
        "--input",
        path(&f.input),
        "--duration",
        "0m",
    ])?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn check_config_prints_normalized_toml() -> Result<(), Box<dyn std::error::Error>> {
    let f = fixture()?;
    let output = kbar(&["check-config", "--config", path(&f.config)])?;
    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout)?;
    assert!(stdout.contains(r#"symbol = "2330""#), "got: {stdout}");

    // the printed config loads back to the same normalized values
    let cfg = kbar_engine::config::load_config_str(stdout)?;
    assert_eq!(cfg.symbol, "2330");
    assert_eq!(cfg.aggregation.duration, kbar_engine::BarDuration::DAY);
    assert_eq!(cfg.indicators.len(), 2);
    Ok(())
}

#[test]
fn check_config_rejects_unknown_keys() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[aggregation]\nduration = 5\nwidth = 3\n")?;
    let output = kbar(&["check-config", "--config", path(&config)])?;
    assert!(!output.status.success());
    assert!(str::from_utf8(&output.stderr)?.contains("bad.toml"));
    Ok(())
}
