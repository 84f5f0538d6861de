use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Signing key used when none is configured outside production.
pub const DEV_JWT_SECRET: &str = "my_secret_key";

#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwaggerConfig {
    pub enabled: SwaggerMode,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SwaggerMode {
    Public,
    Disabled,
}

impl AccountConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AccountConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("account-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", Some(DEV_JWT_SECRET), is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            swagger: SwaggerConfig {
                enabled: get_env("ENABLE_SWAGGER", Some("public"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.secret.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not be empty"
            )));
        }

        if self.environment == Environment::Prod {
            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.jwt.secret == DEV_JWT_SECRET {
                tracing::warn!("JWT_SECRET is the development default in production");
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for SwaggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(SwaggerMode::Public),
            "disabled" => Ok(SwaggerMode::Disabled),
            _ => Err(format!("Invalid swagger mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AccountConfig {
        AccountConfig {
            common: core_config::Config { port: 8080 },
            environment: Environment::Dev,
            service_name: "account-service".to_string(),
            service_version: "0.1.0".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            jwt: JwtConfig {
                secret: DEV_JWT_SECRET.to_string(),
            },
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
            },
            swagger: SwaggerConfig {
                enabled: SwaggerMode::Disabled,
            },
        }
    }

    #[test]
    fn rejects_zero_port_and_empty_secret() {
        let mut cfg = config();
        cfg.common.port = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.jwt.secret.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn wildcard_origin_only_rejected_in_prod() {
        let mut cfg = config();
        assert!(cfg.validate().is_ok());

        cfg.environment = Environment::Prod;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn jwt_secret_is_redacted_in_debug() {
        let rendered = format!("{:?}", config().jwt);
        assert!(!rendered.contains(DEV_JWT_SECRET));
    }

    #[test]
    fn parses_modes_case_insensitively() {
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Prod));
        assert_eq!("Disabled".parse::<SwaggerMode>(), Ok(SwaggerMode::Disabled));
        assert!("staging".parse::<Environment>().is_err());
    }
}
