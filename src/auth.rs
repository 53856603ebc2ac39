//! Credencial e troca de código OAuth
//!
//! O token é definido uma única vez (construção do cliente ou troca de
//! código) e nunca mais muda: [`Credential`] é imutável e barato de clonar,
//! sem lock.

use crate::error::{ClickUpError, Result};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Token de acesso (Personal Token `pk_...` ou token OAuth)
///
/// Vai cru no header `Authorization`, como a API v2 espera.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(ClickUpError::Config("access token is empty".to_string()));
        }
        Ok(Self(Arc::from(token)))
    }

    /// Valor do header `Authorization`
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"***").finish()
    }
}

/// Campos do formulário de `POST oauth/token`
#[derive(Clone)]
pub struct OAuthCode {
    pub client_id: String,
    pub client_secret: String,
    pub code: String,
}

impl OAuthCode {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            code: code.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("code", &self.code),
        ] {
            if value.trim().is_empty() {
                return Err(ClickUpError::missing(field));
            }
        }
        Ok(())
    }

    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("client_id".to_string(), self.client_id.clone()),
            ("client_secret".to_string(), self.client_secret.clone()),
            ("code".to_string(), self.code.clone()),
        ]
    }
}

impl fmt::Debug for OAuthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCode")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("code", &"***")
            .finish()
    }
}

/// Resposta de sucesso de `POST oauth/token`
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse").field("access_token", &"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new("pk_123_SECRET").unwrap();
        assert_eq!(credential.expose(), "pk_123_SECRET");
        assert!(!format!("{:?}", credential).contains("SECRET"));
    }

    #[test]
    fn test_empty_credential_is_rejected() {
        assert!(matches!(Credential::new("   "), Err(ClickUpError::Config(_))));
    }

    #[test]
    fn test_oauth_code_validation() {
        assert!(OAuthCode::new("id", "secret", "code").validate().is_ok());
        assert!(matches!(
            OAuthCode::new("id", "", "code").validate(),
            Err(ClickUpError::Validation(ref m)) if m == "client_secret is required"
        ));

        let fields = OAuthCode::new("id", "secret", "abc").form_fields();
        assert_eq!(
            fields,
            vec![
                ("client_id".to_string(), "id".to_string()),
                ("client_secret".to_string(), "secret".to_string()),
                ("code".to_string(), "abc".to_string()),
            ]
        );
    }
}
