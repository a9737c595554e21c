use crate::error::UigenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Signing key used when neither the config file nor `JWT_SECRET` provides one.
pub const DEVELOPMENT_SECRET: &str = "development-secret-key";

/// Top-level application configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from default path (~/.config/uigen/config.toml),
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Write current configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Write current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("uigen")
            .join("config.toml")
    }

    /// Apply `UIGEN_ENV` and `JWT_SECRET` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), UigenError> {
        if let Ok(env) = std::env::var("UIGEN_ENV") {
            self.auth.environment = env.parse()?;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Bearer token required to mint sessions (None = no auth).
    pub auth_token: Option<String>,
    /// Enable CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            auth_token: None,
            cors: true,
        }
    }
}

/// Session signing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC key for session tokens.
    pub jwt_secret: Option<String>,
    /// Runtime environment; production turns on `Secure` cookies.
    pub environment: Environment,
}

impl AuthConfig {
    /// The configured secret, or the development fallback.
    pub fn signing_secret(&self) -> &str {
        match &self.jwt_secret {
            Some(secret) => secret,
            None => {
                tracing::warn!("No jwt_secret configured, using the development key");
                DEVELOPMENT_SECRET
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = UigenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(UigenError::Config(format!("unknown environment '{}'", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("127.0.0.1"));
        assert!(toml_str.contains("development"));
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.server.port = 4100;
        config.auth.environment = Environment::Production;
        config.auth.jwt_secret = Some("s3cret".into());
        config.save_to(&path).unwrap();

        let parsed = AppConfig::load_from(&path).unwrap();
        assert_eq!(parsed.server.port, 4100);
        assert_eq!(parsed.auth.environment, Environment::Production);
        assert_eq!(parsed.auth.jwt_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[auth]\nenvironment = \"test\"\n").unwrap();
        assert_eq!(parsed.auth.environment, Environment::Test);
        assert_eq!(parsed.server.port, 3000);
        assert!(parsed.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(" Dev ".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
        assert!(Environment::Production.is_production());
        assert!(!Environment::Test.is_production());
    }

    #[test]
    fn test_signing_secret_fallback() {
        let mut auth = AuthConfig::default();
        assert_eq!(auth.signing_secret(), DEVELOPMENT_SECRET);
        auth.jwt_secret = Some("configured".into());
        assert_eq!(auth.signing_secret(), "configured");
    }
}
