use std::net::{IpAddr, SocketAddr};

use translingo::{MtError, MtResult};

/// Listener address, from `HOST` and `PORT`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MtResult<Self> {
        let defaults = Self::default();
        let host = match lookup("HOST").filter(|v| !v.trim().is_empty()) {
            Some(v) => v
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| {
                    MtError::ConfigError(format!("HOST must be a valid IP address: {}", e))
                })?,
            None => defaults.host,
        };
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| {
                    MtError::ConfigError(format!("PORT must be a valid number: {}", e))
                })?,
            None => defaults.port,
        };
        Ok(Self { host, port })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "HOST" => Some("0.0.0.0".to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        match result {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("PORT")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_host() {
        let result =
            ServerConfig::from_lookup(|key| (key == "HOST").then(|| "localhost".to_string()));
        assert!(matches!(result, Err(MtError::ConfigError(_))));
    }
}
