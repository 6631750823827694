use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_FRONTEND_ORIGIN: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub frontend_origin: String,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT is not a port number: {port:?}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
            port,
            frontend_origin: lookup("FRONTEND_ORIGIN")
                .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<_, _> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("DATABASE_URL", "gas.db")]).unwrap();
        assert_eq!(
            config,
            Config {
                database_url: "gas.db".to_owned(),
                bind_addr: "127.0.0.1".to_owned(),
                port: 8081,
                frontend_origin: "http://127.0.0.1:8080".to_owned(),
            }
        );
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("DATABASE_URL", ":memory:"),
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "8000"),
            ("FRONTEND_ORIGIN", "http://dashboard.local"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.frontend_origin, "http://dashboard.local");
    }

    #[test]
    fn database_url_is_required() {
        assert!(config(&[]).is_err());
    }

    #[test]
    fn bad_port() {
        assert!(config(&[("DATABASE_URL", "gas.db"), ("PORT", "http")]).is_err());
    }
}
