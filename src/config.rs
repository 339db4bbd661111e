//! Environment-backed configuration. `.env` files are honored via
//! dotenvy before this is read.

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().context("PORT must be a valid port number")?,
            Err(_) => 8083,
        };
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = match std::env::var("MAX_CONNECTIONS") {
            Ok(v) => v.parse().context("MAX_CONNECTIONS must be a number")?,
            Err(_) => 10,
        };
        Ok(Self { port, database_url, max_connections })
    }
}
