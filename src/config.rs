use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Reads SCOUTDESK_HOST / SCOUTDESK_PORT, falling back to a local
    /// dev binding.
    pub fn from_env() -> Self {
        let host = env::var("SCOUTDESK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SCOUTDESK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_binding() {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 8080,
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
