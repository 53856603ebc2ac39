//! Configuração do cliente
//!
//! Valores padrão fixos da API v2, sobrescrevíveis por variáveis de ambiente
//! com prefixo `CLICKUP_` (e `.env`, quando presente):
//!
//! | Variável                        | Padrão                           |
//! |---------------------------------|----------------------------------|
//! | `CLICKUP_API_TOKEN`             | obrigatório                      |
//! | `CLICKUP_BASE_URL`              | `https://api.clickup.com/api/v2` |
//! | `CLICKUP_MAX_RETRIES`           | `5`                              |
//! | `CLICKUP_RETRY_COOLDOWN_SECS`   | `20`                             |
//! | `CLICKUP_TIMEOUT_SECS`          | `30`                             |
//! | `CLICKUP_CONNECT_TIMEOUT_SECS`  | `5`                              |

use crate::error::{ClickUpError, Result};
use crate::transport::RetryPolicy;
use config::{Config, Environment};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuração de um [`ClickUpApi`](crate::ClickUpApi)
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub retry: RetryPolicy,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            retry: RetryPolicy::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("retry", &self.retry)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Deserialize)]
struct EnvConfig {
    api_token: Option<String>,
    base_url: String,
    max_retries: u32,
    retry_cooldown_secs: u64,
    timeout_secs: u64,
    connect_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Carrega `.env` (se existir) e as variáveis `CLICKUP_*`
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = RetryPolicy::default();
        let settings = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)
            .and_then(|b| b.set_default("max_retries", defaults.max_retries))
            .and_then(|b| b.set_default("retry_cooldown_secs", defaults.cooldown.as_secs()))
            .and_then(|b| b.set_default("timeout_secs", DEFAULT_TIMEOUT_SECS))
            .and_then(|b| b.set_default("connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS))
            .map_err(|e| ClickUpError::Config(e.to_string()))?
            .add_source(Environment::with_prefix("CLICKUP").try_parsing(true))
            .build()
            .map_err(|e| ClickUpError::Config(e.to_string()))?;

        let env: EnvConfig = settings
            .try_deserialize()
            .map_err(|e| ClickUpError::Config(e.to_string()))?;

        let token = env
            .api_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ClickUpError::Config("CLICKUP_API_TOKEN not set".to_string()))?;

        let config = Self {
            base_url: env.base_url,
            token,
            retry: RetryPolicy {
                max_retries: env.max_retries,
                cooldown: Duration::from_secs(env.retry_cooldown_secs),
            },
            timeout_secs: env.timeout_secs,
            connect_timeout_secs: env.connect_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeouts(mut self, total_secs: u64, connect_secs: u64) -> Self {
        self.timeout_secs = total_secs;
        self.connect_timeout_secs = connect_secs;
        self
    }

    /// Base URL e timeouts (o token é validado por [`Credential`](crate::Credential))
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClickUpError::Config(format!("invalid base_url: {}", self.base_url)));
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ClickUpError::Config("timeouts must be greater than zero".to_string()));
        }
        Ok(())
    }
}
