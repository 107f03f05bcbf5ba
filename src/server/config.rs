use std::path::PathBuf;

use crate::server::error::config::ConfigError;

pub static DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub static DEFAULT_MEDIA_ROOT: &str = "./media";
pub static DEFAULT_MEDIA_URL: &str = "/media/";
pub const DEFAULT_PAGE_SIZE: u64 = 6;
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub media_root: PathBuf,
    pub media_url: String,
    pub page_size: u64,
    /// Upper bound for a client supplied `limit`
    pub max_page_size: u64,
}

impl Config {
    /// Read configuration from the environment; only `DATABASE_URL` is required
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL"))?;

        let page_size = positive_size(&lookup, "PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let max_page_size = positive_size(&lookup, "MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?;
        if page_size > max_page_size {
            return Err(ConfigError::invalid(
                "PAGE_SIZE",
                format!("must not exceed MAX_PAGE_SIZE ({})", max_page_size),
            ));
        }

        let mut media_url = lookup("MEDIA_URL").unwrap_or_else(|| DEFAULT_MEDIA_URL.to_string());
        if !media_url.starts_with('/') {
            return Err(ConfigError::invalid("MEDIA_URL", "must start with '/'"));
        }
        if !media_url.ends_with('/') {
            media_url.push('/');
        }

        Ok(Self {
            database_url,
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            media_root: lookup("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT)),
            media_url,
            page_size,
            max_page_size,
        })
    }
}

fn positive_size(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };

    match raw.parse::<u64>() {
        Ok(size) if size > 0 && size <= i64::MAX as u64 => Ok(size),
        _ => Err(ConfigError::invalid(
            var,
            format!("expected a positive integer, got {:?}", raw),
        )),
    }
}
