use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Provider's RSA public key, full PEM or bare base64 body. When unset
    /// the service still runs but rejects every delivery as unauthenticated.
    pub provider_public_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            provider_public_key: env::var("PROVIDER_PUBLIC_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        })
    }
}
