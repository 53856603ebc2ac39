//! Webhooks do ClickUp
//!
//! - Gerenciamento: `GET/POST team/{team_id}/webhook`, `PUT/DELETE webhook/{webhook_id}`
//! - Recepção: [`WebhookEvent`] é o payload que o ClickUp envia ao endpoint,
//!   autenticado por [`verify_signature`] (header `X-Signature`).

use super::custom_field::CustomField;
use super::user::User;
use super::{lenient, timestamp};
use crate::error::{ClickUpError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Curinga que assina todos os eventos
pub const ALL_EVENTS: &str = "*";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookHealth {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub fail_count: i64,
}

/// Webhook registrado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,

    pub endpoint: String,

    #[serde(default)]
    pub events: Vec<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<WebhookHealth>,

    /// Segredo usado para assinar os eventos
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// `GET team/{team_id}/webhook`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhooks {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// Resposta de criação/edição (`{"id": "...", "webhook": {...}}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub id: String,
    pub webhook: Webhook,
}

/// Escopo de um webhook
///
/// Conjunto fechado: o workspace inteiro ou exatamente um recurso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookScope {
    Team,
    Space { space_id: String },
    Folder { folder_id: String },
    List { list_id: String },
    Task { task_id: String },
}

impl WebhookScope {
    /// Campo `{scope}_id` do body (nenhum para `Team`)
    fn field(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Team => None,
            Self::Space { space_id } => Some(("space_id", space_id.as_str())),
            Self::Folder { folder_id } => Some(("folder_id", folder_id.as_str())),
            Self::List { list_id } => Some(("list_id", list_id.as_str())),
            Self::Task { task_id } => Some(("task_id", task_id.as_str())),
        }
    }
}

fn events_or_all(events: Vec<String>) -> Vec<String> {
    if events.is_empty() {
        vec![ALL_EVENTS.to_string()]
    } else {
        events
    }
}

/// `POST team/{team_id}/webhook`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWebhookRequest {
    pub endpoint: String,
    pub events: Vec<String>,
    pub scope: WebhookScope,
}

impl CreateWebhookRequest {
    /// Lista de eventos vazia assina todos (`["*"]`)
    pub fn new(endpoint: impl Into<String>, events: Vec<String>, scope: WebhookScope) -> Self {
        Self {
            endpoint: endpoint.into(),
            events: events_or_all(events),
            scope,
        }
    }

    pub fn team(endpoint: impl Into<String>, events: Vec<String>) -> Self {
        Self::new(endpoint, events, WebhookScope::Team)
    }

    pub fn space(endpoint: impl Into<String>, space_id: impl Into<String>, events: Vec<String>) -> Self {
        let scope = WebhookScope::Space {
            space_id: space_id.into(),
        };
        Self::new(endpoint, events, scope)
    }

    pub fn folder(endpoint: impl Into<String>, folder_id: impl Into<String>, events: Vec<String>) -> Self {
        let scope = WebhookScope::Folder {
            folder_id: folder_id.into(),
        };
        Self::new(endpoint, events, scope)
    }

    pub fn list(endpoint: impl Into<String>, list_id: impl Into<String>, events: Vec<String>) -> Self {
        let scope = WebhookScope::List {
            list_id: list_id.into(),
        };
        Self::new(endpoint, events, scope)
    }

    pub fn task(endpoint: impl Into<String>, task_id: impl Into<String>, events: Vec<String>) -> Self {
        let scope = WebhookScope::Task {
            task_id: task_id.into(),
        };
        Self::new(endpoint, events, scope)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ClickUpError::missing("endpoint"));
        }
        if self.events.is_empty() {
            return Err(ClickUpError::missing("events"));
        }
        if let Some((field, id)) = self.scope.field() {
            if id.trim().is_empty() {
                return Err(ClickUpError::missing(field));
            }
        }
        Ok(())
    }
}

impl Serialize for CreateWebhookRequest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let scope = self.scope.field();
        let mut map = serializer.serialize_map(Some(2 + scope.is_some() as usize))?;
        map.serialize_entry("endpoint", &self.endpoint)?;
        map.serialize_entry("events", &self.events)?;
        if let Some((field, id)) = scope {
            map.serialize_entry(field, id)?;
        }
        map.end()
    }
}

/// `PUT webhook/{webhook_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditWebhookRequest {
    pub endpoint: String,
    pub events: Vec<String>,
    /// `active` ou `suspended`
    pub status: String,
}

impl EditWebhookRequest {
    pub fn new(endpoint: impl Into<String>, events: Vec<String>, status: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            events: events_or_all(events),
            status: status.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ClickUpError::missing("endpoint"));
        }
        if self.status.trim().is_empty() {
            return Err(ClickUpError::missing("status"));
        }
        if self.events.is_empty() {
            return Err(ClickUpError::missing("events"));
        }
        Ok(())
    }
}

// ==================== EVENTOS RECEBIDOS ====================

/// Payload enviado pelo ClickUp ao endpoint do webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Nome do evento (`taskCreated`, `taskStatusUpdated`...)
    pub event: String,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub history_items: Vec<HistoryItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    pub webhook_id: String,
}

/// Item do histórico da task que originou o evento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(rename = "type", default)]
    pub item_type: i64,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default)]
    pub before: Value,

    #[serde(default)]
    pub after: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<CustomField>,
}

impl HistoryItem {
    /// `data.createTask` marca o item de criação da task
    pub fn is_create_task(&self) -> bool {
        self.data.get("createTask").and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Verifica a assinatura `X-Signature` de um evento (HMAC-SHA256 em hex)
///
/// A comparação é feita em tempo constante pelo `hmac`.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_empty_events_subscribe_all() {
        let request = CreateWebhookRequest::list("https://hooks.example.com/cu", "901", vec![]);
        assert_eq!(request.events, vec!["*".to_string()]);

        let edit = EditWebhookRequest::new("https://hooks.example.com/cu", vec![], "active");
        assert_eq!(edit.events, vec!["*".to_string()]);
    }

    #[test]
    fn test_scope_serialization() {
        let request = CreateWebhookRequest::space(
            "https://hooks.example.com/cu",
            "790",
            vec!["taskCreated".to_string()],
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"endpoint": "https://hooks.example.com/cu", "events": ["taskCreated"], "space_id": "790"})
        );

        let team = CreateWebhookRequest::team("https://hooks.example.com/cu", vec![]);
        assert_eq!(
            serde_json::to_value(&team).unwrap(),
            json!({"endpoint": "https://hooks.example.com/cu", "events": ["*"]})
        );
    }

    #[test]
    fn test_validation() {
        assert!(CreateWebhookRequest::team("", vec![]).validate().is_err());
        assert!(CreateWebhookRequest::task("https://x", "", vec![]).validate().is_err());
        assert!(CreateWebhookRequest::task("https://x", "9hz", vec![]).validate().is_ok());
        assert!(EditWebhookRequest::new("https://x", vec![], "").validate().is_err());
        assert!(EditWebhookRequest::new("https://x", vec![], "suspended").validate().is_ok());
    }

    #[test]
    fn test_incoming_event() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "event": "taskCreated",
            "history_items": [{
                "id": "2800763136717140857",
                "type": 1,
                "date": "1642734631523",
                "field": "status",
                "parent_id": "162641062",
                "data": {"createTask": true},
                "source": null,
                "user": {"id": 183, "username": "John"},
                "before": {"status": null},
                "after": {"status": "to do"}
            }],
            "task_id": "1vj37mc",
            "webhook_id": "7fa3ec74-69a8-4530-a251-8a13730bd204"
        }))
        .unwrap();

        let item = &event.history_items[0];
        assert!(item.is_create_task());
        assert_eq!(item.date.unwrap().timestamp_millis(), 1_642_734_631_523);
        assert_eq!(item.after["status"], "to do");
        assert!(item.custom_field.is_none());
    }

    #[test]
    fn test_verify_signature() {
        let secret = "webhook_secret";
        let body = br#"{"event":"taskCreated"}"#;
        let signature = sign(secret, body);

        assert!(verify_signature(secret, body, &signature));
        assert!(!verify_signature(secret, body, "invalid"));
        assert!(!verify_signature("other_secret", body, &signature));
    }

    #[test]
    fn test_webhook_response() {
        let created: WebhookResponse = serde_json::from_value(json!({
            "id": "4b67ac88",
            "webhook": {
                "id": "4b67ac88",
                "userid": 183,
                "team_id": 108,
                "endpoint": "https://yourdomain.com/webhook",
                "events": ["taskCreated"],
                "task_id": null,
                "list_id": null,
                "folder_id": null,
                "space_id": 1234,
                "health": {"status": "active", "fail_count": 0},
                "secret": "O94IM25S7PXBPYTMNXLLET230SRP0S89COR7B1YOJ2ZIE8WQNK5UUKEF26W0Z5GA"
            }
        }))
        .unwrap();

        assert_eq!(created.webhook.team_id.as_deref(), Some("108"));
        assert_eq!(created.webhook.space_id.as_deref(), Some("1234"));
        assert!(created.webhook.list_id.is_none());
    }
}
