//! Media inspection via ffprobe.

use std::path::Path;

use sitcom_common::{SitcomError, SitcomResult};

/// Container duration of `path` in seconds.
pub async fn probe_duration(ffprobe: &Path, path: &Path) -> SitcomResult<f64> {
    if !path.exists() {
        return Err(SitcomError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = tokio::process::Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| SitcomError::encode("ffprobe", format!("failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(SitcomError::encode(
            format!("ffprobe {}", path.display()),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_duration(&stdout).ok_or_else(|| {
        SitcomError::encode(
            format!("ffprobe {}", path.display()),
            format!("unexpected duration output: {}", stdout.trim()),
        )
    })
}

/// Parse ffprobe's bare `duration` output.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Whether `binary` resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    which::which(binary).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3.456000\n"), Some(3.456));
        assert_eq!(parse_duration("\n  12\n"), Some(12.0));
        assert_eq!(parse_duration("N/A\n"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_command_exists() {
        assert!(!command_exists("definitely-not-a-real-binary-xyz"));
    }
}
