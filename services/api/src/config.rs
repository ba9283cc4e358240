use avatar_demo_core::{
    config::{ConfigError, ProviderConfig},
    orchestrator::DeliveryPolicy,
};
use std::net::{IpAddr, SocketAddr};
use tracing::Level;

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub delivery: DeliveryPolicy,
    pub providers: ProviderConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let host_str = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let host = host_str
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidValue("HOST".to_string(), e.to_string()))?;

        let port_str = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port_str
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let delivery = std::env::var("CHAT_DELIVERY")
            .map(|v| v.parse::<DeliveryPolicy>())
            .unwrap_or(Ok(DeliveryPolicy::Strict))
            .map_err(|e| ConfigError::InvalidValue("CHAT_DELIVERY".to_string(), e))?;

        let providers = ProviderConfig::from_env()?;

        Ok(Self {
            bind_address: SocketAddr::new(host, port),
            log_level,
            delivery,
            providers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("RUST_LOG");
            env::remove_var("CHAT_DELIVERY");
            env::remove_var("HEYGEN_API_KEY");
            env::remove_var("HEYGEN_AVATAR_ID");
            env::remove_var("HEYGEN_VOICE_ID");
            env::remove_var("HEYGEN_BASE_URL");
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("GEMINI_MODEL");
            env::remove_var("GEMINI_BASE_URL");
        }
    }

    fn set_minimal_env() {
        unsafe {
            env::set_var("HEYGEN_API_KEY", "test-heygen-key");
            env::set_var("HEYGEN_AVATAR_ID", "test-avatar");
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();
        set_minimal_env();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.delivery, DeliveryPolicy::Strict);
        assert_eq!(config.providers.avatar.avatar_id, "test-avatar");
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "8080");
            env::set_var("RUST_LOG", "debug");
            env::set_var("CHAT_DELIVERY", "best-effort");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.delivery, DeliveryPolicy::BestEffort);
    }

    #[test]
    #[serial]
    fn test_config_invalid_port() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("PORT", "not-a-port");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "PORT"),
            _ => panic!("Expected InvalidValue for PORT"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_delivery_policy() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("CHAT_DELIVERY", "sometimes");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "CHAT_DELIVERY"),
            _ => panic!("Expected InvalidValue for CHAT_DELIVERY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_provider_key() {
        clear_env_vars();
        unsafe {
            env::set_var("HEYGEN_API_KEY", "test-heygen-key");
            env::set_var("HEYGEN_AVATAR_ID", "test-avatar");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "GEMINI_API_KEY"),
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }
}
