//! Error types shared across Sitcom Simulator crates.

use std::path::PathBuf;

/// Top-level error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum SitcomError {
    /// The voice or image provider refused a request. Fatal for the run.
    #[error("Provider rejected request: {message}")]
    ProviderRejected { message: String },

    /// An asynchronous synthesis job reached a non-success terminal state.
    #[error("Synthesis job {job_token} failed with status '{status}'")]
    JobFailed { job_token: String, status: String },

    /// A synthesis job never reached a terminal state within the poll budget.
    #[error("Synthesis job {job_token} still unfinished after {attempts} polls")]
    PollTimedOut { job_token: String, attempts: u32 },

    /// Fetching a resolved asset URL failed.
    #[error("Failed to download asset from {url}: {message}")]
    AssetDownloadFailed { url: String, message: String },

    /// The encoder exited with an error. `diagnostic` is its stderr, verbatim.
    #[error("{context} failed: {diagnostic}")]
    EncodeFailed { context: String, diagnostic: String },

    #[error("Script error: {message}")]
    Script { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SitcomError.
pub type SitcomResult<T> = Result<T, SitcomError>;

impl SitcomError {
    pub fn provider_rejected(msg: impl Into<String>) -> Self {
        Self::ProviderRejected {
            message: msg.into(),
        }
    }

    pub fn job_failed(job_token: impl Into<String>, status: impl Into<String>) -> Self {
        Self::JobFailed {
            job_token: job_token.into(),
            status: status.into(),
        }
    }

    pub fn asset_download(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::AssetDownloadFailed {
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn encode(context: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::EncodeFailed {
            context: context.into(),
            diagnostic: diagnostic.into(),
        }
    }

    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error should abort the whole run.
    ///
    /// Only asset downloads are recoverable; callers degrade the affected
    /// clip instead of stopping.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::AssetDownloadFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failed_keeps_diagnostic_verbatim() {
        let err = SitcomError::encode("ffmpeg segment 2", "Unknown encoder 'libx264'\n");
        assert_eq!(
            err.to_string(),
            "ffmpeg segment 2 failed: Unknown encoder 'libx264'\n"
        );
    }

    #[test]
    fn test_only_downloads_are_recoverable() {
        assert!(!SitcomError::asset_download("http://x/a.png", "404").is_fatal());
        assert!(SitcomError::job_failed("JTINF:1", "complete_failure").is_fatal());
        assert!(SitcomError::provider_rejected("quota").is_fatal());
        assert!(SitcomError::encode("concat", "boom").is_fatal());
    }
}
