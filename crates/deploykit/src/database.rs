//! Binding apps to the platform's shared Postgres service.
//!
//! The service runs on a fixed address inside the platform's subnet. The
//! subnet is read from the API endpoint (`api.10.245.0.34.xip.io`), and the
//! last octet is swapped for the service's.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::DatabaseConfig;

/// Environment variable the buildpacks read the connection string from
pub const DATABASE_URL: &str = "DATABASE_URL";

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})\b").expect("static regex")
});

/// Build the `DATABASE_URL` value for database `name`.
///
/// `api_output` is whatever the platform printed for its API endpoint; the
/// first IPv4 address in it locates the subnet.
pub fn database_url(api_output: &str, name: &str, config: &DatabaseConfig) -> Result<String> {
    let captures = IPV4.captures(api_output).ok_or_else(|| {
        Error::remote(
            "api",
            format!("no IPv4 address in API endpoint: {}", api_output.trim()),
        )
    })?;

    let octets: Vec<&str> = (1..=3).map(|i| &captures[i]).collect();
    let host = format!("{}.{}", octets.join("."), config.host_octet);

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        config.user, config.password, host, config.port, name
    ))
}
