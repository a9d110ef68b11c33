//! Load → compute → save sequencing for a single price file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quiver_data::ReadMode;
use quiver_indicators::{compute_ema, compute_sma};
use tracing::info;

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Price series file to read.
    pub input: PathBuf,
    /// Prefix the `_sma.npy` and `_ema.npy` suffixes are appended to.
    pub output_prefix: PathBuf,
    /// Window length shared by both averages.
    pub window: usize,
    /// How the reader treats trailing payload bytes.
    pub mode: ReadMode,
    /// Number of leading values of each result to log.
    pub preview: usize,
}

/// Result series and the files they were written to.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// File holding the simple moving average.
    pub sma_path: PathBuf,
    /// File holding the exponential moving average.
    pub ema_path: PathBuf,
    /// Simple moving average, aligned with the input.
    pub sma: Vec<f64>,
    /// Exponential moving average, aligned with the input.
    pub ema: Vec<f64>,
}

/// Derives `<prefix>_sma.npy` and `<prefix>_ema.npy`.
pub fn output_paths(prefix: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut name = OsString::from(prefix.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    };
    (with_suffix("_sma.npy"), with_suffix("_ema.npy"))
}

pub fn run_pipeline(request: &PipelineRequest) -> Result<PipelineOutput> {
    info!(path = %request.input.display(), "loading price series");
    let prices = quiver_data::load_with(&request.input, request.mode)
        .with_context(|| format!("failed to load {}", request.input.display()))?;
    info!(points = prices.len(), "loaded price series");

    info!(window = request.window, "computing SMA and EMA");
    let sma = compute_sma(&prices, request.window).context("failed to compute SMA")?;
    let ema = compute_ema(&prices, request.window).context("failed to compute EMA")?;
    info!(
        len = sma.len(),
        first = ?preview(&sma, request.preview),
        "SMA computed"
    );
    info!(
        len = ema.len(),
        first = ?preview(&ema, request.preview),
        "EMA computed"
    );

    let (sma_path, ema_path) = output_paths(&request.output_prefix);
    info!(path = %sma_path.display(), "saving SMA");
    quiver_data::save(&sma_path, &sma)
        .with_context(|| format!("failed to write {}", sma_path.display()))?;
    info!(path = %ema_path.display(), "saving EMA");
    quiver_data::save(&ema_path, &ema)
        .with_context(|| format!("failed to write {}", ema_path.display()))?;
    info!("done");

    Ok(PipelineOutput {
        sma_path,
        ema_path,
        sma,
        ema,
    })
}

fn preview(series: &[f64], count: usize) -> &[f64] {
    &series[..series.len().min(count)]
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn output_paths_append_suffixes() {
        let (sma, ema) = output_paths(Path::new("out/result"));
        assert_eq!(sma, PathBuf::from("out/result_sma.npy"));
        assert_eq!(ema, PathBuf::from("out/result_ema.npy"));
    }

    #[test]
    fn preview_is_bounded_by_series_length() {
        assert_eq!(preview(&[1.0, 2.0], 20), &[1.0, 2.0]);
        assert_eq!(preview(&[1.0, 2.0, 3.0], 1), &[1.0]);
    }

    #[test]
    fn runs_reference_scenario() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("close.npy");
        quiver_data::save(&input, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let output = run_pipeline(&PipelineRequest {
            input,
            output_prefix: temp.path().join("result"),
            window: 2,
            mode: ReadMode::Strict,
            preview: 20,
        })
        .unwrap();

        assert_eq!(output.sma, vec![0.0, 1.5, 2.5, 3.5, 4.5]);
        assert_eq!(quiver_data::load(&output.sma_path).unwrap(), output.sma);
        assert_eq!(quiver_data::load(&output.ema_path).unwrap(), output.ema);
        assert_eq!(output.ema[0], 1.0);
    }

    #[test]
    fn zero_window_fails_without_writing() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("close.npy");
        quiver_data::save(&input, &[1.0, 2.0]).unwrap();
        let prefix = temp.path().join("result");

        let err = run_pipeline(&PipelineRequest {
            input,
            output_prefix: prefix.clone(),
            window: 0,
            mode: ReadMode::Lenient,
            preview: 20,
        })
        .unwrap_err();

        assert!(format!("{err:#}").contains("window must be greater than zero"));
        let (sma_path, ema_path) = output_paths(&prefix);
        assert!(!sma_path.exists());
        assert!(!ema_path.exists());
    }
}
