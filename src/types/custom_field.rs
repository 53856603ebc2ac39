//! Custom Fields do ClickUp
//!
//! O valor de um custom field é JSON arbitrário que depende do tipo do
//! campo. Em vez de `Value` solto, [`CustomFieldValue`] expõe as formas
//! conhecidas para pattern matching e mantém o resto em [`CustomFieldValue::Raw`].
//!
//! ⚠️ Checkbox pode chegar como string `"true"`/`"false"`.
//! ⚠️ Datas são MILISSEGUNDOS (número ou string numérica).

use super::{lenient, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Definição (e, dentro de uma task, valor) de um custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tipo do campo (`text`, `drop_down`, `labels`, `date`, `checkbox`...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_config: Option<TypeConfig>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub date_created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub hide_from_guests: bool,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub required: bool,

    #[serde(default)]
    pub value: CustomFieldValue,
}

impl CustomField {
    /// Opção de dropdown atualmente selecionada
    ///
    /// Drop-downs devolvem o `orderindex` da opção (ou o ID) no `value`.
    pub fn selected_option(&self) -> Option<&FieldOption> {
        let options = &self.type_config.as_ref()?.options;
        match &self.value {
            CustomFieldValue::Number(n) => {
                let index = n.as_i64()?;
                options.iter().find(|o| o.orderindex == Some(index))
            }
            CustomFieldValue::Text(id) => options.iter().find(|o| &o.id == id),
            _ => None,
        }
    }
}

/// Configuração específica do tipo de campo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub options: Vec<FieldOption>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Opção de dropdown/labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: String,

    /// Dropdowns usam `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Labels usam `label`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderindex: Option<i64>,
}

impl FieldOption {
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.label.as_deref())
    }
}

/// Valor de custom field
///
/// A ordem das variantes importa: `untagged` tenta de cima para baixo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    /// Campo sem valor
    Null,
    Bool(bool),
    /// Números (inclusive datas em ms e orderindex de dropdown), sem perda de precisão
    Number(Number),
    Text(String),
    /// IDs de opções (labels)
    Options(Vec<String>),
    Object(Map<String, Value>),
    /// Qualquer outra forma (listas de usuários, anexos...)
    Raw(Value),
}

impl Default for CustomFieldValue {
    fn default() -> Self {
        Self::Null
    }
}

impl CustomFieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Número, aceitando string numérica
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Booleano, aceitando `"true"`/`"false"` (checkbox)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Text(text) => match text.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interpreta o valor como data em epoch milissegundos
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let ms = match self {
            Self::Number(n) => n.as_i64()?,
            Self::Text(text) => text.trim().parse().ok()?,
            _ => return None,
        };
        timestamp::millis(ms)
    }

    pub fn as_options(&self) -> Option<&[String]> {
        match self {
            Self::Options(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn timestamp(date: DateTime<Utc>) -> Self {
        Self::Number(Number::from(date.timestamp_millis()))
    }
}

impl From<&str> for CustomFieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for CustomFieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for CustomFieldValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for CustomFieldValue {
    fn from(number: i64) -> Self {
        Self::Number(Number::from(number))
    }
}

impl From<f64> for CustomFieldValue {
    fn from(number: f64) -> Self {
        Number::from_f64(number).map_or(Self::Null, Self::Number)
    }
}

impl From<Vec<String>> for CustomFieldValue {
    fn from(ids: Vec<String>) -> Self {
        Self::Options(ids)
    }
}

impl From<Value> for CustomFieldValue {
    fn from(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Self::Raw(value))
    }
}

/// `GET list/{list_id}/field`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibleCustomFields {
    #[serde(default)]
    pub fields: Vec<CustomField>,
}

/// Body de `POST task/{task_id}/field/{field_id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetCustomFieldRequest {
    pub value: CustomFieldValue,
}

/// Par `{id, value}` usado na criação de tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldEntry {
    pub id: String,
    pub value: CustomFieldValue,
}

impl CustomFieldEntry {
    pub fn new(id: impl Into<String>, value: impl Into<CustomFieldValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}
