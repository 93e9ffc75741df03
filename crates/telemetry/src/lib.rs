//! Logging and tracing bootstrap for folio.

use anyhow::anyhow;
use folio_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber according to telemetry settings.
///
/// The filter honors `RUST_LOG` and falls back to `info`. Calling this a
/// second time fails because the global subscriber is already set.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
    tracing::debug!(format = ?settings.log_format, "tracing subscriber installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_installs_once_then_rejects() {
        let settings = TelemetrySettings::default();

        assert!(init(&settings).is_ok());
        assert!(init(&settings).is_err());
    }
}
