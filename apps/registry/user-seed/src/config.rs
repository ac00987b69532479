//! Configuration for the seed tool

use core_config::{ConfigError, Environment, FromEnv, env_parse_or_default};
use database::common::RetryConfig;
use database::postgres::PostgresConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database: PostgresConfig,
    /// Connection attempts after the first one fails (`DB_CONNECT_RETRIES`)
    pub connect_retries: u32,
}

impl Config {
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::new().with_max_retries(self.connect_retries)
    }
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            database: PostgresConfig::from_env()?,
            connect_retries: env_parse_or_default("DB_CONNECT_RETRIES", 5)?,
        })
    }
}
