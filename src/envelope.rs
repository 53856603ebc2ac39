//! Envelope de resposta genérico
//!
//! Toda operação devolve um [`ApiResponse<S, E>`]: o status HTTP final mais
//! exatamente um dos payloads (sucesso `S` ou erro `E`). Apenas o status
//! [`SUCCESS_STATUS`] produz payload de sucesso; qualquer outro status é
//! interpretado como payload de erro.
//!
//! Corpo vazio (alguns DELETE) deixa os dois slots vazios, mas o status é
//! preservado. JSON malformado NÃO é mascarado: vira
//! [`ClickUpError::Json`](crate::ClickUpError::Json).

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Único status HTTP que carrega payload de sucesso nesta API
pub const SUCCESS_STATUS: u16 = 200;

/// Resultado de uma chamada à API: status + payload de sucesso ou de erro
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<S, E = ResponseError> {
    status: u16,
    success: Option<S>,
    error: Option<E>,
}

impl<S, E> ApiResponse<S, E>
where
    S: DeserializeOwned,
    E: DeserializeOwned,
{
    /// Classifica o corpo bruto de acordo com o status final
    pub fn from_parts(status: u16, body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self {
                status,
                success: None,
                error: None,
            });
        }

        if status == SUCCESS_STATUS {
            let success = serde_json::from_str(body)?;
            Ok(Self {
                status,
                success: Some(success),
                error: None,
            })
        } else {
            let error = serde_json::from_str(body)?;
            Ok(Self {
                status,
                success: None,
                error: Some(error),
            })
        }
    }
}

impl<S, E> ApiResponse<S, E> {
    /// Status HTTP final (após eventuais retries)
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    pub fn success(&self) -> Option<&S> {
        self.success.as_ref()
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn into_parts(self) -> (u16, Option<S>, Option<E>) {
        (self.status, self.success, self.error)
    }

    /// Converte para `Result`, tratando qualquer status não-200 como falha
    ///
    /// `Ok(None)` significa 200 com corpo vazio.
    pub fn into_result(self) -> std::result::Result<Option<S>, ApiFailure<E>> {
        if self.is_success() {
            Ok(self.success)
        } else {
            Err(ApiFailure {
                status: self.status,
                error: self.error,
            })
        }
    }
}

/// Falha da aplicação ClickUp extraída de um envelope
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure<E = ResponseError> {
    pub status: u16,
    pub error: Option<E>,
}

impl<E: fmt::Display> fmt::Display for ApiFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "ClickUp API error (status {}): {}", self.status, error),
            None => write!(f, "ClickUp API error (status {}) without body", self.status),
        }
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for ApiFailure<E> {}

/// Payload de erro padrão da API
///
/// O ClickUp responde `{"err": "...", "ECODE": "..."}`; a forma
/// `{"message": "...", "code": "..."}` também é aceita. A mensagem é
/// obrigatória: corpo sem ela (página de proxy, payload de sucesso com status
/// inesperado) vira [`ClickUpError::Json`](crate::ClickUpError::Json).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(alias = "err")]
    pub message: String,

    #[serde(alias = "ECODE", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => write!(f, "{} ({})", self.message, code),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Payload de sucesso sem conteúdo relevante (`{}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSuccess {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClickUpError;
    use serde_json::Value;

    #[test]
    fn test_error_status_fills_error_slot() {
        let resp: ApiResponse<Value> =
            ApiResponse::from_parts(404, r#"{"message":"not found","code":"E404"}"#).unwrap();

        assert_eq!(resp.status(), 404);
        assert!(resp.success().is_none());
        assert_eq!(
            resp.error(),
            Some(&ResponseError {
                message: "not found".to_string(),
                code: Some("E404".to_string()),
            })
        );
    }

    #[test]
    fn test_clickup_error_shape() {
        let resp: ApiResponse<Value> =
            ApiResponse::from_parts(401, r#"{"err":"Token invalid","ECODE":"OAUTH_025"}"#).unwrap();
        let error = resp.error().unwrap();
        assert_eq!(error.message, "Token invalid");
        assert_eq!(error.code.as_deref(), Some("OAUTH_025"));
        assert_eq!(error.to_string(), "Token invalid (OAUTH_025)");
    }

    #[test]
    fn test_success_status_fills_success_slot() {
        let resp: ApiResponse<Value> = ApiResponse::from_parts(200, r#"{"id":"abc"}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.success().unwrap()["id"], "abc");
        assert!(resp.error().is_none());
    }

    #[test]
    fn test_other_2xx_is_not_success() {
        // 201/204 não são o status de sucesso desta API
        let resp: ApiResponse<Value> =
            ApiResponse::from_parts(201, r#"{"err":"weird","ECODE":"X"}"#).unwrap();
        assert!(!resp.is_success());
        assert!(resp.error().is_some());
    }

    #[test]
    fn test_body_without_error_shape_fails_loudly() {
        let result: Result<ApiResponse<Value>> = ApiResponse::from_parts(502, r#"{"status":"bad gateway"}"#);
        assert!(matches!(result, Err(ClickUpError::Json(_))));

        let result: Result<ApiResponse<Value>> = ApiResponse::from_parts(201, r#"{"id":"abc","name":"t"}"#);
        assert!(matches!(result, Err(ClickUpError::Json(_))));
    }

    #[test]
    fn test_error_code_is_optional() {
        let resp: ApiResponse<Value> = ApiResponse::from_parts(500, r#"{"err":"Internal error"}"#).unwrap();
        let error = resp.error().unwrap();
        assert_eq!(error.code, None);
        assert_eq!(error.to_string(), "Internal error");
    }

    #[test]
    fn test_empty_body_leaves_both_slots_empty() {
        let resp: ApiResponse<ResponseSuccess> = ApiResponse::from_parts(204, "").unwrap();
        assert_eq!(resp.status(), 204);
        assert!(resp.success().is_none());
        assert!(resp.error().is_none());
    }

    #[test]
    fn test_malformed_body_fails_loudly() {
        let result: Result<ApiResponse<Value>> = ApiResponse::from_parts(200, "{not json");
        assert!(matches!(result, Err(ClickUpError::Json(_))));

        let result: Result<ApiResponse<Value>> = ApiResponse::from_parts(502, "<html>bad gateway</html>");
        assert!(matches!(result, Err(ClickUpError::Json(_))));
    }

    #[test]
    fn test_into_result() {
        let ok: ApiResponse<ResponseSuccess> = ApiResponse::from_parts(200, "{}").unwrap();
        assert_eq!(ok.into_result().unwrap(), Some(ResponseSuccess {}));

        let failed: ApiResponse<ResponseSuccess> =
            ApiResponse::from_parts(400, r#"{"err":"bad","ECODE":"INPUT_001"}"#).unwrap();
        let failure = failed.into_result().unwrap_err();
        assert_eq!(failure.status, 400);
        assert_eq!(failure.to_string(), "ClickUp API error (status 400): bad (INPUT_001)");
    }
}
