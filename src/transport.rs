//! Transporte HTTP com retry em rate limit
//!
//! Um [`ApiRequest`] descreve a chamada (verbo, endereço, body); o
//! [`Transport`] executa, repete em HTTP 429 e classifica o resultado em um
//! [`ApiResponse`].
//!
//! # Política de retry
//!
//! - Apenas 429 é repetido. Qualquer outro status encerra o loop na hora.
//! - Espera FIXA entre tentativas (20s por padrão): sem backoff exponencial,
//!   sem jitter.
//! - No máximo `max_retries` tentativas extras (5 → 6 tentativas no total).
//!   Esgotado o limite, o último 429 é devolvido como envelope de erro.
//!
//! # Cancelamento
//!
//! Um [`CancelSignal`] interrompe tanto a tentativa em andamento quanto o
//! cooldown; um loop cancelado não dispara novas tentativas.
//!
//! O mesmo loop atende o cliente async e o bloqueante
//! ([`BlockingClickUpApi`](crate::BlockingClickUpApi)); só muda quem espera.

use crate::addressing::ResourceAddress;
use crate::auth::Credential;
use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use crate::error::{ClickUpError, Result};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, warn};

/// Status HTTP de rate limit
pub const TOO_MANY_REQUESTS: u16 = 429;

const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

/// Descritor de uma chamada, totalmente resolvido antes do envio
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub address: ResourceAddress,
    pub body: RequestBody,
    /// Envia o header `Authorization` (todas as chamadas exceto a troca de código OAuth)
    pub authorized: bool,
}

impl ApiRequest {
    fn new(method: Method, address: ResourceAddress, body: RequestBody) -> Self {
        Self {
            method,
            address,
            body,
            authorized: true,
        }
    }

    pub fn get(address: ResourceAddress) -> Self {
        Self::new(Method::Get, address, RequestBody::Empty)
    }

    pub fn delete(address: ResourceAddress) -> Self {
        Self::new(Method::Delete, address, RequestBody::Empty)
    }

    pub fn post<B: Serialize + ?Sized>(address: ResourceAddress, body: &B) -> Result<Self> {
        Ok(Self::new(Method::Post, address, RequestBody::Json(serde_json::to_value(body)?)))
    }

    pub fn put<B: Serialize + ?Sized>(address: ResourceAddress, body: &B) -> Result<Self> {
        Ok(Self::new(Method::Put, address, RequestBody::Json(serde_json::to_value(body)?)))
    }

    /// POST de formulário sem `Authorization`
    pub fn form(address: ResourceAddress, fields: Vec<(String, String)>) -> Self {
        Self {
            authorized: false,
            ..Self::new(Method::Post, address, RequestBody::Form(fields))
        }
    }
}

/// Política de retry em HTTP 429
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Tentativas extras após a primeira
    pub max_retries: u32,
    /// Espera fixa antes de cada nova tentativa
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl RetryPolicy {
    /// Sem retry: o primeiro 429 já é devolvido
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            cooldown: Duration::ZERO,
        }
    }

    /// Total máximo de tentativas (primeira + retries)
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

// ==================== CANCELAMENTO ====================

/// Lado que dispara o cancelamento
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Lado que observa o cancelamento
///
/// O padrão ([`CancelSignal::never`]) nunca dispara.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Option<watch::Receiver<bool>>);

impl CancelSignal {
    pub fn never() -> Self {
        Self(None)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.as_ref().map_or(false, |rx| *rx.borrow())
    }

    /// Resolve quando o cancelamento dispara (nunca, se o handle foi descartado sem cancelar)
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.0 {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}

/// Cria um par handle/sinal de cancelamento
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(Arc::new(tx)), CancelSignal(Some(rx)))
}

// ==================== RETRY ====================

/// Status + corpo bruto de uma tentativa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Executa `attempt` até obter um status diferente de 429 ou esgotar a política
///
/// `attempt` recebe o número da tentativa (a partir de 1).
pub(crate) async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancelSignal,
    mut attempt: F,
) -> Result<RawResponse>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<RawResponse>>,
{
    let mut attempt_no: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(ClickUpError::Cancelled);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClickUpError::Cancelled),
            result = attempt(attempt_no) => result?,
        };

        if response.status != TOO_MANY_REQUESTS {
            return Ok(response);
        }

        if attempt_no > policy.max_retries {
            error!(
                attempts = attempt_no,
                "❌ Rate limit do ClickUp persistiu após {} tentativas", attempt_no
            );
            return Ok(response);
        }

        warn!(
            attempt = attempt_no,
            cooldown_secs = policy.cooldown.as_secs_f64(),
            "⏳ Rate limit (429) do ClickUp, aguardando antes de tentar novamente"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClickUpError::Cancelled),
            _ = tokio::time::sleep(policy.cooldown) => {}
        }

        attempt_no += 1;
    }
}

// ==================== TRANSPORTE ====================

/// Executor HTTP: um `reqwest::Client` reaproveitado, a URL base e a credencial
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
    retry: RetryPolicy,
}

impl Transport {
    pub fn new(config: &ClientConfig, credential: Option<Credential>) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ClickUpError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential,
            retry: config.retry,
        })
    }

    /// Mesma conexão e política, outra credencial
    pub(crate) fn with_credential(&self, credential: Credential) -> Self {
        Self {
            credential: Some(credential),
            ..self.clone()
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn url(&self, address: &ResourceAddress) -> String {
        format!("{}/{}", self.base_url, address.path_and_query())
    }

    /// Executa a chamada com retry e classifica a resposta final
    pub async fn execute<S, E>(&self, request: &ApiRequest, cancel: &CancelSignal) -> Result<ApiResponse<S, E>>
    where
        S: DeserializeOwned,
        E: DeserializeOwned,
    {
        if request.authorized && self.credential.is_none() {
            return Err(ClickUpError::Auth("access token not set".to_string()));
        }

        let raw = run_with_retry(&self.retry, cancel, |attempt| self.send_once(request, attempt)).await?;
        ApiResponse::from_parts(raw.status, &raw.body)
    }

    async fn send_once(&self, request: &ApiRequest, attempt: u32) -> Result<RawResponse> {
        let url = self.url(&request.address);
        debug!(method = %request.method, attempt, "🌐 {} {}", request.method, url);

        let mut builder = self.http.request(request.method.into(), &url);

        if request.authorized {
            if let Some(credential) = &self.credential {
                builder = builder.header(AUTHORIZATION, credential.expose());
            }
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, attempt, "Resposta ClickUp recebida");

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing;
    use crate::envelope::ResponseError;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn raw(status: u16) -> RawResponse {
        RawResponse {
            status,
            body: "{}".to_string(),
        }
    }

    fn transport(server: &MockServer, cooldown: Duration) -> Transport {
        let config = ClientConfig::new("pk_test")
            .base_url(server.base_url())
            .retry(RetryPolicy {
                max_retries: 5,
                cooldown,
            });
        Transport::new(&config, Some(Credential::new("pk_test").unwrap())).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.cooldown, Duration::from_secs(20));
        assert_eq!(policy.attempts(), 6);
        assert_eq!(RetryPolicy::none().attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_stops_on_first_non_429() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let response = run_with_retry(&RetryPolicy::default(), &CancelSignal::never(), |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, ClickUpError>(raw(if n < 3 { 429 } else { 200 })) }
        })
        .await
        .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Dois cooldowns fixos de 20s, sem backoff
        assert!(started.elapsed() >= Duration::from_secs(40));
        assert!(started.elapsed() < Duration::from_secs(41));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_returns_last_429() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let response = run_with_retry(&RetryPolicy::default(), &CancelSignal::never(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ClickUpError>(raw(429)) }
        })
        .await
        .unwrap();

        assert_eq!(response.status, 429);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        // Sem espera depois da última tentativa
        assert!(started.elapsed() >= Duration::from_secs(100));
        assert!(started.elapsed() < Duration::from_secs(101));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let response = run_with_retry(&RetryPolicy::default(), &CancelSignal::never(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ClickUpError>(raw(500)) }
        })
        .await
        .unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_cooldown_stops_attempts() {
        let (handle, signal) = cancel_pair();
        let calls = AtomicU32::new(0);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            handle.cancel();
        });

        let result = run_with_retry(&RetryPolicy::default(), &signal, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ClickUpError>(raw(429)) }
        })
        .await;

        assert!(matches!(result, Err(ClickUpError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_in_flight_attempt() {
        let (handle, signal) = cancel_pair();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.cancel();
        });

        let result = run_with_retry(&RetryPolicy::default(), &signal, |_| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, ClickUpError>(raw(200))
        })
        .await;

        assert!(matches!(result, Err(ClickUpError::Cancelled)));
    }

    #[tokio::test]
    async fn test_already_cancelled_makes_no_attempt() {
        let (handle, signal) = cancel_pair();
        handle.cancel();
        assert!(signal.is_cancelled());

        let calls = AtomicU32::new(0);
        let result = run_with_retry(&RetryPolicy::default(), &signal, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ClickUpError>(raw(200)) }
        })
        .await;

        assert!(matches!(result, Err(ClickUpError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_http_429_is_retried_six_times() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/team");
                then.status(429).json_body(json!({"err": "Rate limit reached", "ECODE": "APP_002"}));
            })
            .await;

        let transport = transport(&server, Duration::from_millis(10));
        let response: ApiResponse<Value> = transport
            .execute(&ApiRequest::get(addressing::teams()), &CancelSignal::never())
            .await
            .unwrap();

        mock.assert_hits_async(6).await;
        assert_eq!(response.status(), 429);
        assert!(response.success().is_none());
        assert_eq!(response.error().unwrap().code.as_deref(), Some("APP_002"));
    }

    #[tokio::test]
    async fn test_http_404_is_returned_without_retry() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/list/901")
                    .header("authorization", "pk_test");
                then.status(404).json_body(json!({"message": "not found", "code": "E404"}));
            })
            .await;

        let transport = transport(&server, Duration::from_millis(10));
        let response: ApiResponse<Value> = transport
            .execute(&ApiRequest::get(addressing::list("901").unwrap()), &CancelSignal::never())
            .await
            .unwrap();

        mock.assert_hits_async(1).await;
        assert_eq!(response.status(), 404);
        assert_eq!(
            response.error(),
            Some(&ResponseError {
                message: "not found".to_string(),
                code: Some("E404".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/space/790/folder")
                    .json_body(json!({"name": "Projetos"}));
                then.status(200).json_body(json!({"id": "457", "name": "Projetos"}));
            })
            .await;

        let transport = transport(&server, Duration::from_millis(10));
        let request = ApiRequest::post(addressing::space_folders("790").unwrap(), &json!({"name": "Projetos"})).unwrap();
        let response: ApiResponse<Value> = transport.execute(&request, &CancelSignal::never()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.success().unwrap()["id"], "457");
    }

    #[tokio::test]
    async fn test_authorized_request_requires_credential() {
        let config = ClientConfig::default();
        let transport = Transport::new(&config, None).unwrap();

        let result: Result<ApiResponse<Value>> = transport
            .execute(&ApiRequest::get(addressing::user()), &CancelSignal::never())
            .await;

        assert!(matches!(result, Err(ClickUpError::Auth(_))));
    }
}
