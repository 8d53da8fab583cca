use anyhow::{Context, Result};

/// Connection string used when `DATABASE_URL` is absent — a local
/// development database with no credentials.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sensor_database";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: optional("DATABASE_URL", DEFAULT_DATABASE_URL),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_falls_back_to_default() {
        assert_eq!(
            optional("SENSOR_DB_TEST_UNSET_VAR", DEFAULT_DATABASE_URL),
            DEFAULT_DATABASE_URL
        );
    }

    #[test]
    fn optional_prefers_env_value() {
        std::env::set_var("SENSOR_DB_TEST_SET_VAR", "value");
        assert_eq!(optional("SENSOR_DB_TEST_SET_VAR", "default"), "value");
        std::env::remove_var("SENSOR_DB_TEST_SET_VAR");
    }
}
