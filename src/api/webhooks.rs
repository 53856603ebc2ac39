//! Registro de webhooks
//!
//! A validação de eventos recebidos fica em [`verify_signature`](crate::verify_signature).

use super::{ApiResult, ClickUpApi};
use crate::addressing;
use crate::envelope::ResponseSuccess;
use crate::transport::ApiRequest;
use crate::types::{CreateWebhookRequest, EditWebhookRequest, WebhookResponse, Webhooks};
use tracing::info;

impl ClickUpApi {
    /// Webhooks criados pelo token no team
    ///
    /// # Endpoint da API
    /// `GET /team/{team_id}/webhook`
    pub async fn team_webhooks(&self, team_id: &str) -> ApiResult<Webhooks> {
        self.call(ApiRequest::get(addressing::team_webhooks(team_id)?)).await
    }

    /// Registra um webhook no escopo do request
    ///
    /// # Endpoint da API
    /// `POST /team/{team_id}/webhook`
    ///
    /// # Exemplo
    /// ```rust,ignore
    /// let request = CreateWebhookRequest::list("https://hooks.acme.dev/clickup", "901", vec![]);
    /// let created = api.create_webhook("9011", &request).await?; // eventos: ["*"]
    /// ```
    pub async fn create_webhook(&self, team_id: &str, request: &CreateWebhookRequest) -> ApiResult<WebhookResponse> {
        request.validate()?;
        let address = addressing::team_webhooks(team_id)?;
        let response = self.call::<WebhookResponse>(ApiRequest::post(address, request)?).await?;

        if let Some(created) = response.success() {
            info!("🔔 Webhook {} registrado para {}", created.id, created.webhook.endpoint);
        }
        Ok(response)
    }

    /// `PUT /webhook/{webhook_id}`
    pub async fn edit_webhook(&self, webhook_id: &str, request: &EditWebhookRequest) -> ApiResult<WebhookResponse> {
        request.validate()?;
        let address = addressing::webhook(webhook_id)?;
        self.call(ApiRequest::put(address, request)?).await
    }

    /// `DELETE /webhook/{webhook_id}`
    pub async fn delete_webhook(&self, webhook_id: &str) -> ApiResult<ResponseSuccess> {
        self.call(ApiRequest::delete(addressing::webhook(webhook_id)?)).await
    }
}
