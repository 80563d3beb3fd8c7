use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// File looked up (any supported extension) when `PUPPY_MONITOR_CONFIG` is unset.
pub const DEFAULT_CONFIG_NAME: &str = "puppy_monitor";
const ENV_PREFIX: &str = "PUPPY_MONITOR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sites: Vec<SiteSpec>,
    /// Six-field cron expression (with seconds), evaluated in UTC.
    pub schedule: String,
    pub run_on_startup: bool,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub transport: TransportKind,
    pub probe_enabled: bool,
    pub probe_addr: SocketAddr,
    pub log_json: bool,
}

/// One monitored page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSpec {
    pub name: String,
    pub url: String,
    pub expected_text: String,
    pub selector: TargetSelector,
}

/// Tag name plus whitespace-separated class tokens that must all be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSelector {
    pub tag: String,
    #[serde(default)]
    pub class: String,
}

impl TargetSelector {
    pub fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.to_string(),
        }
    }

    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.class.split_whitespace()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    SendGrid,
    Smtp,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::SendGrid => write!(f, "SendGrid"),
            TransportKind::Smtp => write!(f, "SMTP"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            schedule: "0 */2 * * * *".to_string(),
            run_on_startup: true,
            fetch_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
            transport: TransportKind::default(),
            probe_enabled: true,
            probe_addr: SocketAddr::from(([0, 0, 0, 0], 7071)),
            log_json: false,
        }
    }
}

fn default_sites() -> Vec<SiteSpec> {
    vec![SiteSpec {
        name: "Golden Harmony Wurfplanung".to_string(),
        url: "https://www.goldenharmony.ch/zucht/wurfplanung".to_string(),
        expected_text: "Aktuell ist kein Wurf geplant. Daher nehmen wir auch keine Anfragen entgegen. Wir bitten um Verständnis.".to_string(),
        selector: TargetSelector::new("h2", "uk-h2 uk-text-warning"),
    }]
}

impl Config {
    /// Defaults, then the optional config file, then `PUPPY_MONITOR_*` variables.
    pub fn load() -> Result<Self> {
        let path = std::env::var("PUPPY_MONITOR_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_NAME.to_string());

        Self::layered(::config::File::with_name(&path).required(false), None)
            .with_context(|| format!("Failed to load configuration from {}", path))
    }

    /// `file` over the defaults, `PUPPY_MONITOR_*` variables over both.
    /// `env` replaces the process environment when given.
    fn layered<S>(file: S, env: Option<HashMap<String, String>>) -> Result<Self>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let settings = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to read configuration")?;

        Self::from_settings(settings)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()
            .context("Failed to parse TOML configuration")?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: ::config::Config) -> Result<Self> {
        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.sites.is_empty(), "No sites configured");
        ensure!(self.fetch_timeout_secs > 0, "fetch_timeout_secs must be positive");
        ensure!(!self.schedule.trim().is_empty(), "schedule must not be empty");

        for site in &self.sites {
            ensure!(!site.name.trim().is_empty(), "Site with URL {} has no name", site.url);

            let url = Url::parse(&site.url)
                .with_context(|| format!("Invalid URL for site {}: {}", site.name, site.url))?;
            ensure!(
                matches!(url.scheme(), "http" | "https"),
                "Unsupported URL scheme for site {}: {}",
                site.name,
                url.scheme()
            );

            ensure!(
                !site.selector.tag.trim().is_empty(),
                "Site {} has an empty selector tag",
                site.name
            );
        }

        Ok(())
    }
}
