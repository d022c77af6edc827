use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub whatsapp: WhatsAppConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Destination of the order messages generated at checkout.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub phone_number: String,
    pub store_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "1048576".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            whatsapp: WhatsAppConfig {
                phone_number: env::var("WHATSAPP_NUMBER")?,
                store_name: env::var("STORE_NAME")
                    .unwrap_or_else(|_| "STG CATALOG".to_string()),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
