//! Endereçamento de recursos da API v2
//!
//! Cada operação resolve um [`ResourceAddress`] (segmentos de path + query)
//! antes de qualquer I/O. IDs vazios são rejeitados aqui, com
//! [`ClickUpError::Validation`], sem tocar a rede.
//!
//! # Tasks: ID canônico vs. custom ID
//!
//! Tasks podem ser endereçadas de duas formas mutuamente exclusivas:
//!
//! - canônica: `task/{task_id}[/{sub}]`
//! - custom:   `task/{custom_id}[/{sub}]?custom_task_ids=true&team_id={team_id}`
//!
//! A escolha acontece em um único lugar ([`TaskRef::address`]) e vale para
//! fetch, delete, update, custom fields e comentários.
//!
//! # Filtros de listagem
//!
//! Filtros só entram na query quando foram explicitamente definidos:
//! ausência NÃO é o mesmo que `false`/`0` no wire.
//!
//! ⚠️ `space_ids[]` em `GET /team/{team_id}/task` NÃO é suportado: a API
//! responde `{"err":"Internal server error","ECODE":"ITEMV2_003"}`. Não
//! reintroduzir sem verificar o comportamento upstream.

use crate::error::{ClickUpError, Result};
use serde_json::{json, Value};
use std::fmt;

/// Path + query resolvidos de um recurso
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAddress {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ResourceAddress {
    /// Cria um endereço a partir do recurso raiz (ex: `"team"`)
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            segments: vec![root.into()],
            query: Vec::new(),
        }
    }

    /// Anexa um segmento de path
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Anexa um parâmetro de query
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Anexa um parâmetro de query apenas quando definido
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Path relativo à URL base, com segmentos percent-encoded
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Path + query string (sem `?` quando não há parâmetros)
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path();
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.path(), query)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_and_query())
    }
}

/// Valida um identificador obrigatório
pub(crate) fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(ClickUpError::missing(field))
    } else {
        Ok(value)
    }
}

// ==================== ENDEREÇOS FIXOS ====================

pub fn user() -> ResourceAddress {
    ResourceAddress::new("user")
}

pub fn teams() -> ResourceAddress {
    ResourceAddress::new("team")
}

pub fn oauth_token() -> ResourceAddress {
    ResourceAddress::new("oauth").segment("token")
}

// ==================== TEAM / SPACE / FOLDER / LIST ====================

pub fn team(team_id: &str) -> Result<ResourceAddress> {
    Ok(teams().segment(require("team_id", team_id)?))
}

pub fn team_spaces(team_id: &str) -> Result<ResourceAddress> {
    Ok(team(team_id)?.segment("space"))
}

pub fn team_webhooks(team_id: &str) -> Result<ResourceAddress> {
    Ok(team(team_id)?.segment("webhook"))
}

pub fn space_folders(space_id: &str) -> Result<ResourceAddress> {
    Ok(ResourceAddress::new("space")
        .segment(require("space_id", space_id)?)
        .segment("folder"))
}

pub fn space_lists(space_id: &str) -> Result<ResourceAddress> {
    Ok(ResourceAddress::new("space")
        .segment(require("space_id", space_id)?)
        .segment("list"))
}

pub fn folder_lists(folder_id: &str) -> Result<ResourceAddress> {
    Ok(ResourceAddress::new("folder")
        .segment(require("folder_id", folder_id)?)
        .segment("list"))
}

pub fn list(list_id: &str) -> Result<ResourceAddress> {
    Ok(ResourceAddress::new("list").segment(require("list_id", list_id)?))
}

pub fn list_members(list_id: &str) -> Result<ResourceAddress> {
    Ok(list(list_id)?.segment("member"))
}

pub fn list_fields(list_id: &str) -> Result<ResourceAddress> {
    Ok(list(list_id)?.segment("field"))
}

pub fn webhook(webhook_id: &str) -> Result<ResourceAddress> {
    Ok(ResourceAddress::new("webhook").segment(require("webhook_id", webhook_id)?))
}

/// `GET list/{list_id}/task` com filtros opcionais
pub fn list_tasks(list_id: &str, query: &ListTasksQuery) -> Result<ResourceAddress> {
    let address = list(list_id)?
        .segment("task")
        .query_opt("archived", query.archived)
        .query_opt("page", query.page)
        .query_opt("include_closed", query.include_closed)
        .query_opt("subtasks", query.subtasks);
    Ok(address)
}

/// `GET team/{team_id}/task` com filtros opcionais
pub fn team_tasks(team_id: &str, query: &TeamTasksQuery) -> Result<ResourceAddress> {
    let mut address = team(team_id)?
        .segment("task")
        .query_opt("page", query.page)
        .query_opt("include_closed", query.include_closed)
        .query_opt("subtasks", query.subtasks);

    if !query.custom_fields.is_empty() {
        let expressions = query
            .custom_fields
            .iter()
            .map(CustomFieldFilter::expression)
            .collect::<Vec<_>>()
            .join(",");
        address = address.query("custom_fields", format!("[{}]", expressions));
    }

    Ok(address)
}

// ==================== TASKS ====================

/// Referência a uma task: ID canônico OU custom ID + team
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    Canonical { task_id: String },
    Custom { custom_id: String, team_id: String },
}

impl TaskRef {
    pub fn canonical(task_id: impl Into<String>) -> Self {
        Self::Canonical {
            task_id: task_id.into(),
        }
    }

    /// Custom ID exige o team (workspace) dono da task
    pub fn custom(custom_id: impl Into<String>, team_id: impl Into<String>) -> Result<Self> {
        let custom_id = custom_id.into();
        let team_id = team_id.into();
        require("custom_task_id", &custom_id)?;
        require("team_id", &team_id)?;
        Ok(Self::Custom { custom_id, team_id })
    }

    /// ID usado no path (canônico ou custom)
    pub fn id(&self) -> &str {
        match self {
            Self::Canonical { task_id } => task_id,
            Self::Custom { custom_id, .. } => custom_id,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// Resolve `task/{id}/{sub...}`, com a query de custom ID quando aplicável
    pub fn address(&self, sub: &[&str]) -> Result<ResourceAddress> {
        let mut address = match self {
            Self::Canonical { task_id } => {
                ResourceAddress::new("task").segment(require("task_id", task_id)?)
            }
            Self::Custom { custom_id, .. } => {
                ResourceAddress::new("task").segment(require("custom_task_id", custom_id)?)
            }
        };

        for segment in sub {
            address = address.segment(*segment);
        }

        if let Self::Custom { team_id, .. } = self {
            address = address
                .query("custom_task_ids", true)
                .query("team_id", require("team_id", team_id)?);
        }

        Ok(address)
    }
}

impl From<&str> for TaskRef {
    fn from(task_id: &str) -> Self {
        Self::canonical(task_id)
    }
}

impl From<String> for TaskRef {
    fn from(task_id: String) -> Self {
        Self::canonical(task_id)
    }
}

// ==================== FILTROS ====================

/// Filtros de `GET list/{list_id}/task`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTasksQuery {
    pub archived: Option<bool>,
    pub page: Option<u32>,
    pub include_closed: Option<bool>,
    pub subtasks: Option<bool>,
}

impl ListTasksQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn include_closed(mut self, include: bool) -> Self {
        self.include_closed = Some(include);
        self
    }

    pub fn subtasks(mut self, include: bool) -> Self {
        self.subtasks = Some(include);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }
}

/// Filtros de `GET team/{team_id}/task`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTasksQuery {
    pub page: Option<u32>,
    pub include_closed: Option<bool>,
    pub subtasks: Option<bool>,
    pub custom_fields: Vec<CustomFieldFilter>,
}

impl TeamTasksQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn include_closed(mut self, include: bool) -> Self {
        self.include_closed = Some(include);
        self
    }

    pub fn subtasks(mut self, include: bool) -> Self {
        self.subtasks = Some(include);
        self
    }

    pub fn custom_field(mut self, filter: CustomFieldFilter) -> Self {
        self.custom_fields.push(filter);
        self
    }
}

/// Operadores aceitos no filtro `custom_fields`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Expressão de filtro por custom field
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldFilter {
    pub field_id: String,
    pub operator: FilterOperator,
    pub value: Option<Value>,
}

impl CustomFieldFilter {
    pub fn new(field_id: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value: Some(value.into()),
        }
    }

    pub fn equals(field_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_id, FilterOperator::Equals, value)
    }

    pub fn is_null(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            operator: FilterOperator::IsNull,
            value: None,
        }
    }

    /// Objeto JSON esperado dentro de `custom_fields=[...]`
    pub fn expression(&self) -> String {
        let mut expr = json!({
            "field_id": self.field_id,
            "operator": self.operator.as_str(),
        });
        if let Some(value) = &self.value {
            expr["value"] = value.clone();
        }
        expr.to_string()
    }
}
