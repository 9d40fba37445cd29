//! Clip duration probing via ffprobe.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::ProbeConfig;
use crate::error::{PlaygenError, Result};

/// Resolves the playable length of a media file.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds. Errors are recoverable; callers substitute a default.
    async fn probe(&self, path: &Path) -> Result<f64>;
}

/// Runs `ffprobe` (or a compatible command) with a timeout.
pub struct FfprobeProbe {
    command: String,
    timeout: Duration,
}

impl FfprobeProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    async fn execute(&self, path: &Path) -> std::io::Result<std::process::Output> {
        let mut cmd = Command::new(&self.command);
        cmd.args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

        let child = cmd.spawn()?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("{} timed out after {}ms", self.command, self.timeout.as_millis()),
            )),
        }
    }
}

#[async_trait]
impl DurationProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> Result<f64> {
        let output = self
            .execute(path)
            .await
            .map_err(|e| PlaygenError::Probe(format!("{}: {}", path.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlaygenError::Probe(format!(
                "{}: exit code {:?}: {}",
                path.display(),
                output.status.code(),
                stderr.trim()
            )));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Always reports the same duration. Used when probing is disabled.
pub struct FixedDurationProbe {
    duration: f64,
}

impl FixedDurationProbe {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl DurationProbe for FixedDurationProbe {
    async fn probe(&self, _path: &Path) -> Result<f64> {
        Ok(self.duration)
    }
}

/// Parse ffprobe's bare `format=duration` output.
pub fn parse_duration(output: &str) -> Result<f64> {
    let line = output.lines().next().unwrap_or("").trim();
    let duration: f64 = line
        .parse()
        .map_err(|_| PlaygenError::Probe(format!("non-numeric duration '{}'", line)))?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PlaygenError::Probe(format!("invalid duration {}", duration)));
    }
    Ok(duration)
}

/// Probe a file, falling back to `default` on any failure.
pub async fn duration_or_default(probe: &dyn DurationProbe, path: &Path, default: f64) -> f64 {
    match probe.probe(path).await {
        Ok(duration) => duration,
        Err(e) => {
            log::warn!("Using default duration {}s for {}: {}", default, path.display(), e);
            default
        }
    }
}
