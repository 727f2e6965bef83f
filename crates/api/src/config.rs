//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `PUBLIC_BASE_URL` | `http://localhost:8080` |
//! | `JWT_SECRET` | insecure dev secret (logged as a warning) |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | required when `USE_PERSISTENT_STORES=true` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |
//! | `SEED_SAMPLE_DATA` | `true` |

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, anyhow, bail};

pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Prefix for `Location` headers, without a trailing slash.
    pub public_base_url: String,
    pub jwt_secret: String,
    pub store: StoreBackend,
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            public_base_url: "http://localhost:8080".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            store: StoreBackend::InMemory,
            seed_sample_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("BIND_ADDR must be host:port, got '{raw}'"))?,
            None => defaults.bind_addr,
        };

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.public_base_url);

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                defaults.jwt_secret
            }
        };

        let store = if parse_flag(&lookup, "USE_PERSISTENT_STORES", false)? {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.is_empty())
                .ok_or_else(|| anyhow!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"))?;
            let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be a number, got '{raw}'"))?,
                None => 5,
            };
            StoreBackend::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreBackend::InMemory
        };

        Ok(Self {
            bind_addr,
            public_base_url,
            jwt_secret,
            store,
            seed_sample_data: parse_flag(&lookup, "SEED_SAMPLE_DATA", defaults.seed_sample_data)?,
        })
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("{key} must be true or false, got '{other}'"),
    }
}
