use dotenv::dotenv;
use log::*;

use std::env;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://postgres@localhost/pollbits";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/**
 * Runtime configuration, built once at startup and handed to whatever needs it
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub listen: String,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            listen: DEFAULT_LISTEN.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    /**
     * Load the configuration from the environment, reading a `.env` file first if one exists
     */
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let Config {
            database_url: default_url,
            listen: default_listen,
            max_connections: default_max,
        } = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            debug!("DATABASE_URL not set, using {}", default_url);
            default_url
        });

        let listen = lookup("LISTEN_ADDR").unwrap_or(default_listen);

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("Invalid DATABASE_MAX_CONNECTIONS {:?}: {}", raw, err);
                default_max
            }),
            None => default_max,
        };

        Self {
            database_url,
            listen,
            max_connections,
        }
    }
}
