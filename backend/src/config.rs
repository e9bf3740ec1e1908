use anyhow::Context;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Fixed PRNG seed for reproducible seasons; entropy-seeded when unset
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .context("DATABASE_URL environment variable must be set")?;

        let server_port = match env::var("SERVER_PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got '{}'", port))?,
            Err(_) => 8080,
        };

        let rng_seed = match env::var("LEAGUE_RNG_SEED") {
            Ok(seed) => Some(
                seed.parse()
                    .with_context(|| format!("LEAGUE_RNG_SEED must be an unsigned integer, got '{}'", seed))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port,
            rng_seed,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
