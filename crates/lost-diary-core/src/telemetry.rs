//! Tracing bootstrap for host applications.

use tracing_subscriber::EnvFilter;

use crate::error::StoryError;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Installs a global `tracing` subscriber filtered by `RUST_LOG`, defaulting
/// to `info`.
///
/// # Errors
///
/// Returns `StoryError::Config` if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), StoryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| StoryError::Config(format!("tracing subscriber init failed: {e}")))?;
    tracing::debug!(?format, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_config_error() {
        // Arrange
        let first = init_tracing(LogFormat::Json);

        // Act
        let second = init_tracing(LogFormat::Pretty);

        // Assert
        assert!(first.is_ok());
        assert!(matches!(second, Err(StoryError::Config(_))));
    }
}
