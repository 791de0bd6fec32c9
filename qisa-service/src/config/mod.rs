use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default outbound call timeout.
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct QisaConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub gateway: GatewaySettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Model used for answers (e.g., gemini-2.0-flash)
    pub model: String,
    pub api_base: String,
    pub instruction_mode: InstructionMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    pub timeout_secs: u64,
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// How the instruction block reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionMode {
    /// Gemini's dedicated `systemInstruction` field.
    #[default]
    Native,
    /// A user turn placed before the question, annotated as internal setup.
    PrecedingTurn,
}

impl FromStr for InstructionMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(InstructionMode::Native),
            "preceding_turn" | "preceding-turn" => Ok(InstructionMode::PrecedingTurn),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_INSTRUCTION_MODE must be 'native' or 'preceding_turn', got '{}'",
                other
            ))),
        }
    }
}

impl QisaConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(QisaConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI", None, is_prod)?),
                model: get_env("GEMINI_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                instruction_mode: get_env("GEMINI_INSTRUCTION_MODE", Some("native"), is_prod)?
                    .parse()?,
            },
            gateway: GatewaySettings {
                timeout_secs: parse_timeout_secs(&get_env(
                    "GATEWAY_TIMEOUT_SECS",
                    Some(&DEFAULT_GATEWAY_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?)?,
            },
            observability: ObservabilitySettings {
                log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

/// Timeout must be a whole number of seconds greater than zero.
fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "GATEWAY_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
            raw
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
