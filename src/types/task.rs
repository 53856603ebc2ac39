//! Task types do ClickUp
//!
//! - [`Task`]: resposta da API (campos não tipados ficam em `extra`)
//! - [`CreateTaskRequest`]: `POST list/{list_id}/task`
//! - [`TaskUpdate`]: `PUT task/{task_id}` parcial, só envia o que foi definido
//! - [`EditTaskRequest`]: formato antigo de edição completa, mantido apenas
//!   para a operação bloqueada `edit_task`

use super::custom_field::{CustomField, CustomFieldEntry, CustomFieldValue};
use super::hierarchy::ResourceRef;
use super::user::{User, UserDelta};
use super::{lenient, timestamp, Priority};
use crate::error::{ClickUpError, Result};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Status de uma task (`{"status": "in progress", "color": "#...", "type": "custom"}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub status_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderindex: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_fg: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_bg: Option<String>,
}

/// Task como devolvida pela API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderindex: Option<String>,

    // ==================== DATAS (ms) ====================
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date_created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date_updated: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date_closed: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,

    // ==================== PESSOAS ====================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub assignees: Vec<User>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub watchers: Vec<User>,

    // ==================== ORGANIZAÇÃO ====================
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub tags: Vec<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Estimativa em milissegundos
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub custom_fields: Vec<CustomField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ResourceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<ResourceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<ResourceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub archived: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Busca um custom field da task pelo ID
    pub fn custom_field(&self, field_id: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.id == field_id)
    }
}

/// `GET list/{list_id}/task` e `GET team/{team_id}/task`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tasks {
    #[serde(default)]
    pub tasks: Vec<Task>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<bool>,
}

/// `true` quando a data carrega horário (e não apenas o dia)
fn has_time(date: &DateTime<Utc>) -> bool {
    date.num_seconds_from_midnight() > 0
}

// ==================== CRIAÇÃO ====================

/// Payload para `POST list/{list_id}/task`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTaskRequest {
    /// Nome/título da task (obrigatório)
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_time: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_all: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldEntry>,
}

impl CreateTaskRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            assignees: Vec::new(),
            tags: Vec::new(),
            status: None,
            priority: None,
            due_date: None,
            due_date_time: None,
            start_date: None,
            start_date_time: None,
            parent: None,
            time_estimate: None,
            points: None,
            notify_all: None,
            custom_fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn assignee(mut self, user_id: i64) -> Self {
        self.assignees.push(user_id);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Define due date; `due_date_time` acompanha o horário da data
    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date_time = Some(has_time(&due_date));
        self.due_date = Some(due_date);
        self
    }

    pub fn start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date_time = Some(has_time(&start_date));
        self.start_date = Some(start_date);
        self
    }

    /// Define tarefa pai (subtask)
    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent = Some(parent_id.into());
        self
    }

    pub fn notify_all(mut self, notify: bool) -> Self {
        self.notify_all = Some(notify);
        self
    }

    pub fn custom_field(mut self, field_id: impl Into<String>, value: impl Into<CustomFieldValue>) -> Self {
        self.custom_fields.push(CustomFieldEntry::new(field_id, value));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClickUpError::missing("name"));
        }
        if self.custom_fields.iter().any(|f| f.id.trim().is_empty()) {
            return Err(ClickUpError::missing("custom_fields[].id"));
        }
        Ok(())
    }
}

// ==================== EDIÇÃO COMPLETA (BLOQUEADA) ====================

/// Formato de edição completa de task
///
/// ⚠️ Enviar este payload sobrescreve campos não informados e danifica a
/// task. A operação `edit_task` que o aceita está bloqueada; use
/// [`TaskUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<Priority>,
    #[serde(with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
    pub parent: Option<String>,
    pub time_estimate: Option<i64>,
    #[serde(with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,
    pub points: Option<f64>,
    pub assignees: UserDelta,
    pub archived: Option<bool>,
}

// ==================== ATUALIZAÇÃO PARCIAL ====================

/// Delta de relacionamentos entre tasks (`{"add": [...], "rem": [...]}`)
///
/// Usado como valor de custom fields do tipo relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDelta {
    #[serde(default)]
    pub add: Vec<String>,

    #[serde(default)]
    pub rem: Vec<String>,
}

impl RelationshipDelta {
    pub fn add(task_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            add: task_ids.into_iter().map(Into::into).collect(),
            rem: Vec::new(),
        }
    }

    pub fn remove(task_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            add: Vec::new(),
            rem: task_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RelationshipDelta> for CustomFieldValue {
    fn from(delta: RelationshipDelta) -> Self {
        CustomFieldValue::from(json!({"add": delta.add, "rem": delta.rem}))
    }
}

impl From<UserDelta> for CustomFieldValue {
    fn from(delta: UserDelta) -> Self {
        CustomFieldValue::from(json!({"add": delta.add, "rem": delta.rem}))
    }
}

/// Payload parcial para `PUT task/{task_id}`
///
/// Apenas campos `Some` são serializados: o que não foi definido não é
/// tocado no servidor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_time: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<UserDelta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date_time = Some(has_time(&due_date));
        self.due_date = Some(due_date);
        self
    }

    pub fn start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date_time = Some(has_time(&start_date));
        self.start_date = Some(start_date);
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent = Some(parent_id.into());
        self
    }

    pub fn time_estimate(mut self, millis: i64) -> Self {
        self.time_estimate = Some(millis);
        self
    }

    pub fn points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }

    pub fn assignees(mut self, delta: UserDelta) -> Self {
        self.assignees = Some(delta);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Rejeita updates vazios e nome em branco
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ClickUpError::Validation("task update has no fields set".to_string()));
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ClickUpError::missing("name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::millis;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_from_api() {
        let task: Task = serde_json::from_value(json!({
            "id": "9hx",
            "custom_id": "DEV-42",
            "name": "Revisar contrato",
            "status": {"status": "in progress", "color": "#d3d3d3", "type": "custom", "orderindex": 1},
            "date_created": "1567780450202",
            "due_date": null,
            "assignees": [{"id": 183, "username": "John Doe"}],
            "tags": null,
            "priority": {"id": "2", "priority": "high", "color": "#ffcc00"},
            "list": {"id": "123"},
            "folder": {"id": "456", "hidden": false},
            "space": {"id": "789"},
            "custom_fields": [{"id": "f-1", "name": "Valor", "type": "currency", "value": "1500"}],
            "url": "https://app.clickup.com/t/9hx",
            "sharing": {"public": false}
        }))
        .unwrap();

        assert_eq!(task.custom_id.as_deref(), Some("DEV-42"));
        assert_eq!(task.date_created.unwrap().timestamp_millis(), 1_567_780_450_202);
        assert!(task.due_date.is_none());
        assert!(task.tags.is_empty());
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.assignees[0].id, 183);
        assert_eq!(task.custom_field("f-1").unwrap().value.as_f64(), Some(1500.0));
        assert_eq!(task.extra["sharing"]["public"], false);
    }

    #[test]
    fn test_create_task_request() {
        let due = millis(1_700_000_000_000).unwrap();
        let request = CreateTaskRequest::new("Nova task")
            .assignee(183)
            .tag("urgente")
            .priority(Priority::Urgent)
            .due_date(due)
            .custom_field("f-1", "abc");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Nova task",
                "assignees": [183],
                "tags": ["urgente"],
                "priority": 1,
                "due_date": 1_700_000_000_000_i64,
                "due_date_time": true,
                "custom_fields": [{"id": "f-1", "value": "abc"}]
            })
        );
        assert!(request.validate().is_ok());
        assert!(CreateTaskRequest::new("  ").validate().is_err());
    }

    #[test]
    fn test_midnight_due_date_has_no_time() {
        // 2023-11-15T00:00:00Z
        let midnight = millis(1_700_006_400_000).unwrap();
        let update = TaskUpdate::new().due_date(midnight);
        assert_eq!(update.due_date_time, Some(false));
    }

    #[test]
    fn test_task_update_only_serializes_set_fields() {
        let update = TaskUpdate::new()
            .status("done")
            .assignees(UserDelta::add([183]).and_remove(7));

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"status": "done", "assignees": {"add": [183], "rem": [7]}})
        );
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(matches!(TaskUpdate::new().validate(), Err(ClickUpError::Validation(_))));
        assert!(TaskUpdate::new().name("").validate().is_err());
    }

    #[test]
    fn test_relationship_delta_as_field_value() {
        let value: CustomFieldValue = RelationshipDelta::add(["abc"]).into();
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"add": ["abc"], "rem": []}));
    }
}
