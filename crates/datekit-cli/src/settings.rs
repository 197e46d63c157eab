//! Layered configuration for the `datekit` binary.
//!
//! Precedence, lowest first: built-in defaults, `datekit.toml` in the
//! working directory, a file passed with `--config`, then `DATEKIT_*`
//! environment variables. Command-line flags override all of them.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// IANA zone name; the host zone is used when unset.
    pub timezone: Option<String>,
    /// `tracing` filter directive, e.g. `warn` or `datekit=debug`.
    pub log_level: String,
}

impl Settings {
    /// Load settings from the default file, an optional explicit file, and
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any source fails
    /// to deserialize.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("log_level", "warn")?
            .add_source(File::with_name("datekit").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(Environment::with_prefix("DATEKIT").ignore_empty(true))
            .build()
            .context("failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("invalid configuration")
    }
}
