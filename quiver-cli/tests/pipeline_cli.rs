use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use assert_cmd::prelude::*;
use tempfile::tempdir;

fn quiver(args: &[&str]) -> Command {
    let binary = assert_cmd::cargo::cargo_bin!("quiver-cli");
    let mut cmd = Command::new(binary);
    cmd.env_remove("RUST_LOG")
        .env_remove("QUIVER__WINDOW")
        .env_remove("QUIVER__CODEC__MODE")
        .env_remove("QUIVER__BACKTEST__FAST")
        .env_remove("QUIVER__BACKTEST__SLOW")
        .args(args);
    cmd
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn run_writes_sma_and_ema_files() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close_prices.npy");
    let prefix = temp.path().join("result");
    quiver_data::save(&input, &[1.0, 2.0, 3.0, 4.0, 5.0])?;

    quiver(&["run", "--window", "2", arg(&input), arg(&prefix)])
        .assert()
        .success();

    let sma = quiver_data::load(temp.path().join("result_sma.npy"))?;
    let ema = quiver_data::load(temp.path().join("result_ema.npy"))?;
    assert_eq!(sma, vec![0.0, 1.5, 2.5, 3.5, 4.5]);
    let expected = [1.0, 5.0 / 3.0, 23.0 / 9.0, 95.0 / 27.0, 365.0 / 81.0];
    assert_eq!(ema.len(), expected.len());
    for (actual, expected) in ema.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-12, "{actual} vs {expected}");
    }
    Ok(())
}

#[test]
fn window_defaults_to_configuration() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close.npy");
    let prefix = temp.path().join("out");
    let config = temp.path().join("quiver.toml");
    quiver_data::save(&input, &[2.0, 4.0, 6.0, 8.0])?;
    fs::write(&config, "window = 3\n")?;

    quiver(&["--config", arg(&config), "run", arg(&input), arg(&prefix)])
        .assert()
        .success();

    let sma = quiver_data::load(temp.path().join("out_sma.npy"))?;
    assert_eq!(sma, vec![0.0, 0.0, 4.0, 6.0]);
    Ok(())
}

#[test]
fn window_larger_than_memory_yields_warmup_sma() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close.npy");
    let prefix = temp.path().join("wide");
    quiver_data::save(&input, &[1.0, 2.0, 3.0])?;

    quiver(&["run", "--window", "1000000000000", arg(&input), arg(&prefix)])
        .assert()
        .success();

    let sma = quiver_data::load(temp.path().join("wide_sma.npy"))?;
    assert_eq!(sma, vec![0.0; 3]);
    Ok(())
}

#[test]
fn rejects_file_without_magic() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("prices.csv");
    fs::write(&input, "1.0,2.0,3.0\n")?;

    let output = quiver(&[
        "run",
        "--window",
        "2",
        arg(&input),
        arg(&temp.path().join("r")),
    ])
    .output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not a recognized array file"));
    assert!(!temp.path().join("r_sma.npy").exists());
    Ok(())
}

#[test]
fn rejects_empty_array() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("empty.npy");
    quiver_data::save(&input, &[])?;

    let output = quiver(&[
        "run",
        "--window",
        "2",
        arg(&input),
        arg(&temp.path().join("r")),
    ])
    .output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("array file contains no data"));
    Ok(())
}

#[test]
fn strict_flag_rejects_trailing_bytes() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close.npy");
    quiver_data::save(&input, &[1.0, 2.0, 3.0])?;
    let mut bytes = fs::read(&input)?;
    bytes.extend_from_slice(&[0, 0, 0]);
    fs::write(&input, bytes)?;
    let prefix = temp.path().join("r");

    quiver(&["run", "-w", "2", arg(&input), arg(&prefix)])
        .assert()
        .success();
    let output = quiver(&["run", "-w", "2", "--strict", arg(&input), arg(&prefix)]).output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("trailing payload bytes"));
    Ok(())
}

#[test]
fn inspect_prints_header() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close.npy");
    quiver_data::save(&input, &[1.0; 5])?;

    let output = quiver(&["inspect", arg(&input)]).output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("version: 1.0"));
    assert!(stdout.contains("descr: <f8"));
    assert!(stdout.contains("shape: [5]"));
    assert!(stdout.contains("payload offset: 80"));
    Ok(())
}

#[test]
fn convert_extracts_close_column() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("ohlcvt.csv");
    let output = temp.path().join("close_prices.npy");
    fs::write(&input, "1,1.0,1.2,0.9,1.1,10,3\n2,1.1,1.3,1.0,1.25,12,4\n")?;

    quiver(&["convert", arg(&input), arg(&output)])
        .assert()
        .success();

    assert_eq!(quiver_data::load(&output)?, vec![1.1, 1.25]);
    Ok(())
}

#[test]
fn convert_reports_bad_rows() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("ohlcvt.csv");
    fs::write(&input, "1,1.0,1.2\n")?;

    let output = quiver(&["convert", arg(&input), arg(&temp.path().join("out.npy"))]).output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("row 1 has no column 4"));
    Ok(())
}

#[test]
fn backtest_prints_statistics() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close.npy");
    quiver_data::save(&input, &[3.0, 2.0, 1.0, 2.0, 3.0, 4.0])?;

    let output = quiver(&["backtest", "--fast", "1", "--slow", "2", arg(&input)]).output()?;

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("SMA Total Simple Return: 1.0000"));
    assert!(stdout.contains("SMA Max Drawdown: 0.0000"));
    assert!(stdout.contains("EMA Total Log Return: 0.6931"));
    assert!(stdout.contains("EMA Sharpe Ratio:"));
    Ok(())
}

#[test]
fn backtest_rejects_fast_window_not_below_slow() -> Result<()> {
    let temp = tempdir()?;
    let input = temp.path().join("close.npy");
    quiver_data::save(&input, &[1.0, 2.0, 3.0])?;

    let output = quiver(&["backtest", "--fast", "5", "--slow", "5", arg(&input)]).output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("must be shorter than slow window"));
    Ok(())
}
