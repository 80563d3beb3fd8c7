use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` plus `puppy_monitor=info`.
pub fn filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env().add_directive("puppy_monitor=info".parse()?))
}

/// Installs the global subscriber; fails if one is already set.
pub fn init(json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter()?);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
