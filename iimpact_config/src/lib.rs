use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
use iimpact_models::email_address::{EmailAddress, EmailAddressWithName};
use serde::Deserialize;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable holding a colon-separated list of config files.
pub const CONFIG_PATH_VAR: &str = "IIMPACT_CONFIG";

/// Load the config from the files listed in `IIMPACT_CONFIG`, or from the
/// bundled default config if the variable is not set.
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var(CONFIG_PATH_VAR) {
        Ok(paths) => std::env::split_paths(&paths).collect::<Vec<_>>(),
        Err(_) => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };
    load_paths(&paths)
}

/// Load the config from the given files. Values in later files override
/// values in earlier ones.
pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from: EmailAddressWithName,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Receives contact form enquiries. Also shown to visitors as the support
    /// address and used as Reply-To when a submission has no usable address.
    pub email: EmailAddress,
    /// Static page holding the contact form.
    pub contact_page: String,
}
