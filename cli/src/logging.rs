//! stderr logging for `popkit`.
//!
//! stdout carries command output (and `--json` documents), so every log line
//! goes to stderr. Levels come from `--log-level` plus any number of
//! `--log-component crate=level` overrides.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Crate name (either `-` or `_` form) to level.
    pub components: BTreeMap<String, String>,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".into(), components: BTreeMap::new(), json: false }
    }
}

impl LogConfig {
    /// Add one `crate=level` override as given on the command line.
    pub fn with_component(mut self, directive: &str) -> Result<Self> {
        let (target, level) = parse_component(directive)?;
        self.components.insert(target, level);
        Ok(self)
    }

    /// Filter directives, global level first, e.g. `warn,popkit_errors=debug`.
    pub fn directives(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(
                self.components
                    .iter()
                    .map(|(target, level)| format!("{}={level}", target.replace('-', "_"))),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Split `popkit-setters=trace` into `("popkit_setters", "trace")`.
pub fn parse_component(directive: &str) -> Result<(String, String)> {
    let Some((target, level)) = directive.split_once('=') else {
        bail!("log component '{directive}' must look like crate=level");
    };
    let (target, level) = (target.trim(), level.trim().to_ascii_lowercase());
    if target.is_empty() {
        bail!("log component '{directive}' has no crate name");
    }
    if !LEVELS.contains(&level.as_str()) {
        bail!("log component '{directive}': unknown level '{level}'");
    }
    Ok((target.replace('-', "_"), level))
}

/// Install the global subscriber; call once.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    if config.json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }
}
