//! API service configuration

use anyhow::Result;
use std::net::SocketAddr;

/// API service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// Upper bound on the page size of movie listings
    pub max_page_limit: u32,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_HOST`: bind host (default: "0.0.0.0")
    /// - `API_PORT`: bind port (default: 3001)
    /// - `MAX_PAGE_LIMIT`: largest accepted `limit` (default: 100)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("API_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid API_PORT: {}", e))?;

        let listen_addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid API_HOST: {}", e))?;

        let max_page_limit: u32 = std::env::var("MAX_PAGE_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid MAX_PAGE_LIMIT: {}", e))?;

        if max_page_limit == 0 {
            anyhow::bail!("MAX_PAGE_LIMIT must be at least 1");
        }

        Ok(ApiConfig {
            listen_addr,
            max_page_limit,
        })
    }
}
