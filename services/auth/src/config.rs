//! Authentication service configuration

use anyhow::Result;
use std::net::SocketAddr;

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// Whether the token cookie carries the `Secure` attribute
    pub secure_cookie: bool,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTH_HOST`: bind host (default: "0.0.0.0")
    /// - `AUTH_PORT`: bind port (default: 3000)
    /// - `APP_ENV`: `production` marks the token cookie as secure
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("AUTH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("AUTH_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid AUTH_PORT: {}", e))?;

        let listen_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid AUTH_HOST: {}", e))?;

        let secure_cookie = std::env::var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(AuthConfig {
            listen_addr,
            secure_cookie,
        })
    }
}
