//! Hierarquia do workspace: Space → Folder → List
//!
//! Apenas os campos necessários para navegação e criação são tipados; o
//! restante (features, statuses, permissões) passa adiante em `extra`.

use super::{lenient, timestamp, Priority};
use crate::error::{ClickUpError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Referência compacta a um recurso pai (`{"id": "...", "name": "..."}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<bool>,
}

// ==================== SPACE ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub multiple_assignees: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET team/{team_id}/space`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spaces {
    #[serde(default)]
    pub spaces: Vec<Space>,
}

/// `POST team/{team_id}/space`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSpaceRequest {
    pub name: String,

    pub multiple_assignees: bool,

    /// Objeto `features` repassado como está (due_dates, time_tracking, tags...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Value>,
}

impl CreateSpaceRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiple_assignees: false,
            features: None,
        }
    }

    pub fn multiple_assignees(mut self, enabled: bool) -> Self {
        self.multiple_assignees = enabled;
        self
    }

    pub fn features(mut self, features: Value) -> Self {
        self.features = Some(features);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_name(&self.name)
    }
}

// ==================== FOLDER ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderindex: Option<i64>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<ResourceRef>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub task_count: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub lists: Vec<List>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET space/{space_id}/folder`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folders {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// `POST space/{space_id}/folder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFolderRequest {
    pub name: String,
}

impl CreateFolderRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        require_name(&self.name)
    }
}

// ==================== LIST ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderindex: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<ResourceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<ResourceRef>,

    #[serde(default)]
    pub archived: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET folder/{folder_id}/list` e `GET space/{space_id}/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lists {
    #[serde(default)]
    pub lists: Vec<List>,
}

/// `POST folder/{folder_id}/list` e `POST space/{space_id}/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateListRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// ID do usuário responsável
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateListRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
            due_date: None,
            priority: None,
            assignee: None,
            status: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn assignee(mut self, user_id: i64) -> Self {
        self.assignee = Some(user_id);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_name(&self.name)
    }
}

/// `PUT list/{list_id}`: apenas os campos definidos são enviados
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,

    /// Remove o status da lista
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unset_status: Option<bool>,
}

impl EditListRequest {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => require_name(name),
            None => Ok(()),
        }
    }
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(ClickUpError::missing("name"))
    } else {
        Ok(())
    }
}
