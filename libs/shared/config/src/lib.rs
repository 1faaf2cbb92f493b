use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub bind_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_host: env::var("BIND_HOST").unwrap_or_else(|_| {
                warn!("BIND_HOST not set, using 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            bind_port: env::var("BIND_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| {
                    warn!("BIND_PORT not set or invalid, using 3000");
                    3000
                }),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.bind_port)
    }
}
