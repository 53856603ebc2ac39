//! Fachada da API: um método por operação
//!
//! Cada operação é {verbo, endereço, body tipado opcional, tipo de sucesso}.
//! Retry e classificação ficam no [`Transport`]; endereçamento em
//! [`addressing`](crate::addressing). Erros da aplicação ClickUp voltam como
//! dado no [`ApiResponse`]; só validação local, guarda de operação bloqueada,
//! cancelamento, falha de rede e JSON malformado viram `Err`.
//!
//! ```rust,ignore
//! use clickup_rest::{ClickUpApi, ListTasksQuery};
//!
//! let api = ClickUpApi::new("pk_your_token")?;
//! let tasks = api.list_tasks("901", &ListTasksQuery::default().include_closed(true)).await?;
//! match tasks.into_result() {
//!     Ok(Some(tasks)) => println!("{} tasks", tasks.tasks.len()),
//!     Ok(None) => println!("sem corpo"),
//!     Err(failure) => eprintln!("{}", failure),
//! }
//! ```

mod comments;
mod hierarchy;
mod tasks;
mod webhooks;

use crate::addressing;
use crate::auth::{Credential, OAuthCode, TokenResponse};
use crate::config::ClientConfig;
use crate::envelope::{ApiResponse, ResponseError};
use crate::error::{ClickUpError, Result};
use crate::transport::{ApiRequest, CancelSignal, Transport};
use serde::de::DeserializeOwned;
use tracing::info;

/// Resultado padrão de uma operação: envelope com [`ResponseError`] no slot de erro
pub type ApiResult<S> = Result<ApiResponse<S, ResponseError>>;

/// Cliente async da API v2 do ClickUp
///
/// `Clone` é barato (o `reqwest::Client` e a credencial são compartilhados).
/// O token é definido na construção e nunca muda.
#[derive(Debug, Clone)]
pub struct ClickUpApi {
    transport: Transport,
    cancel: CancelSignal,
}

impl ClickUpApi {
    /// Cliente com configuração padrão e o token informado
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(token))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let credential = Credential::new(&config.token)?;
        Ok(Self {
            transport: Transport::new(&config, Some(credential))?,
            cancel: CancelSignal::never(),
        })
    }

    /// Cliente a partir de `CLICKUP_*` / `.env`
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Troca um código OAuth por token e devolve o cliente autenticado
    pub async fn exchange_code(code: &OAuthCode) -> Result<Self> {
        Self::exchange_code_with_config(ClientConfig::default(), code).await
    }

    /// Igual a [`exchange_code`](Self::exchange_code), com base URL/timeouts próprios
    ///
    /// O token de `config` é ignorado.
    pub async fn exchange_code_with_config(config: ClientConfig, code: &OAuthCode) -> Result<Self> {
        code.validate()?;

        let transport = Transport::new(&config, None)?;
        let request = ApiRequest::form(addressing::oauth_token(), code.form_fields());
        let response: ApiResponse<TokenResponse> = transport.execute(&request, &CancelSignal::never()).await?;

        let (status, success, error) = response.into_parts();
        match (success, error) {
            (Some(token), _) => {
                let credential = Credential::new(&token.access_token)
                    .map_err(|_| ClickUpError::Auth("token exchange returned an empty access_token".to_string()))?;
                info!("🔐 Token OAuth obtido com sucesso");
                Ok(Self {
                    transport: transport.with_credential(credential),
                    cancel: CancelSignal::never(),
                })
            }
            (None, Some(error)) => Err(ClickUpError::Auth(error.to_string())),
            (None, None) => Err(ClickUpError::Auth(format!(
                "token exchange failed with status {}",
                status
            ))),
        }
    }

    /// Cópia do cliente cujas chamadas respeitam o sinal de cancelamento
    pub fn with_cancel(&self, cancel: CancelSignal) -> Self {
        Self {
            transport: self.transport.clone(),
            cancel,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn call<S: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<S> {
        self.transport.execute(&request, &self.cancel).await
    }
}
