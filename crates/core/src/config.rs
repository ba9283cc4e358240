//! Provider settings shared by the API server and the credential probe.

use secrecy::SecretString;

pub const DEFAULT_AVATAR_BASE_URL: &str = "https://api.heygen.com";
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-pro";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Credentials and identity for the streaming-avatar provider.
#[derive(Debug)]
pub struct AvatarConfig {
    pub api_key: SecretString,
    pub avatar_id: String,
    pub voice_id: Option<String>,
    pub base_url: String,
}

impl AvatarConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("HEYGEN_API_KEY")?;
        let avatar_id = required("HEYGEN_AVATAR_ID")?;
        let voice_id = std::env::var("HEYGEN_VOICE_ID")
            .ok()
            .filter(|v| !v.is_empty());
        let base_url = base_url("HEYGEN_BASE_URL", DEFAULT_AVATAR_BASE_URL)?;

        Ok(Self {
            api_key: SecretString::new(api_key.into_boxed_str()),
            avatar_id,
            voice_id,
            base_url,
        })
    }
}

/// Credentials and model for the text-generation provider.
#[derive(Debug)]
pub struct GenerationConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

impl GenerationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("GEMINI_API_KEY")?;
        let model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string());
        let base_url = base_url("GEMINI_BASE_URL", DEFAULT_GENERATION_BASE_URL)?;

        Ok(Self {
            api_key: SecretString::new(api_key.into_boxed_str()),
            model,
            base_url,
        })
    }
}

/// Settings for both external providers.
#[derive(Debug)]
pub struct ProviderConfig {
    pub avatar: AvatarConfig,
    pub generation: GenerationConfig,
}

impl ProviderConfig {
    /// Loads provider settings from environment variables.
    ///
    /// Does not read `.env`; callers load it first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            avatar: AvatarConfig::from_env()?,
            generation: GenerationConfig::from_env()?,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn base_url(name: &str, default: &str) -> Result<String, ConfigError> {
    let url = std::env::var(name).unwrap_or_else(|_| default.to_string());
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not an http(s) URL", url),
        ));
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
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
            env::set_var("HEYGEN_AVATAR_ID", "Anna_public_3_20240108");
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal() {
        clear_env_vars();
        set_minimal_env();

        let config = ProviderConfig::from_env().expect("Config should load successfully");

        assert_eq!(config.avatar.api_key.expose_secret(), "test-heygen-key");
        assert_eq!(config.avatar.avatar_id, "Anna_public_3_20240108");
        assert_eq!(config.avatar.voice_id, None);
        assert_eq!(config.avatar.base_url, DEFAULT_AVATAR_BASE_URL);
        assert_eq!(config.generation.api_key.expose_secret(), "test-gemini-key");
        assert_eq!(config.generation.model, "gemini-pro");
        assert_eq!(config.generation.base_url, DEFAULT_GENERATION_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("HEYGEN_VOICE_ID", "voice-1");
            env::set_var("HEYGEN_BASE_URL", "http://127.0.0.1:9000/");
            env::set_var("GEMINI_MODEL", "gemini-1.5-flash");
            env::set_var("GEMINI_BASE_URL", "http://127.0.0.1:9001");
        }

        let config = ProviderConfig::from_env().expect("Config should load successfully");

        assert_eq!(config.avatar.voice_id.as_deref(), Some("voice-1"));
        assert_eq!(config.avatar.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.generation.model, "gemini-1.5-flash");
        assert_eq!(config.generation.base_url, "http://127.0.0.1:9001");
    }

    #[test]
    #[serial]
    fn test_config_missing_avatar_key() {
        clear_env_vars();
        unsafe {
            env::set_var("HEYGEN_AVATAR_ID", "avatar");
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
        }

        let err = ProviderConfig::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "HEYGEN_API_KEY"),
            _ => panic!("Expected MissingVar for HEYGEN_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_empty_gemini_key_is_missing() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("GEMINI_API_KEY", "");
        }

        let err = ProviderConfig::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "GEMINI_API_KEY"),
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_base_url() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("HEYGEN_BASE_URL", "api.heygen.com");
        }

        let err = ProviderConfig::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "HEYGEN_BASE_URL"),
            _ => panic!("Expected InvalidValue for HEYGEN_BASE_URL"),
        }
    }

    #[test]
    #[serial]
    fn test_avatar_config_loads_without_generation_key() {
        clear_env_vars();
        unsafe {
            env::set_var("HEYGEN_API_KEY", "test-heygen-key");
            env::set_var("HEYGEN_AVATAR_ID", "avatar");
        }

        let avatar = AvatarConfig::from_env().expect("Avatar config should load on its own");
        assert_eq!(avatar.avatar_id, "avatar");

        match GenerationConfig::from_env().unwrap_err() {
            ConfigError::MissingVar(var) => assert_eq!(var, "GEMINI_API_KEY"),
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }
}
