//! Tipos de erro para o crate clickup_rest
//!
//! Erros da aplicação ClickUp (validação, not found, permissão) NÃO aparecem aqui:
//! eles chegam como dado no slot de erro do [`ApiResponse`](crate::ApiResponse).
//! Este enum cobre apenas o que impede a obtenção de um envelope.

use thiserror::Error;

/// Erros do cliente ClickUp
#[derive(Debug, Error)]
pub enum ClickUpError {
    /// Falha de transporte (conexão, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Corpo de resposta malformado ou body de requisição não serializável
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Pré-condição local violada antes de qualquer chamada de rede
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operação bloqueada permanentemente (nunca é repetida)
    #[error("Operation `{operation}` is disabled: {reason}")]
    Disabled {
        operation: &'static str,
        reason: &'static str,
    },

    /// O sinal de cancelamento disparou durante uma tentativa ou um cooldown
    #[error("Request cancelled")]
    Cancelled,

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    Config(String),

    /// Troca de código OAuth falhou
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl ClickUpError {
    /// Atalho para campos obrigatórios ausentes
    pub(crate) fn missing(field: &str) -> Self {
        Self::Validation(format!("{} is required", field))
    }

    /// `true` para erros de programação que nunca devem ser tratados como transitórios
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Disabled { .. } | Self::Validation(_))
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, ClickUpError>;
