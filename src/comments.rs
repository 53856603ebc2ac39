//! Comentários rich text
//!
//! Um comentário do ClickUp é uma sequência ordenada de runs (formato delta):
//! cada run é um trecho de texto com atributos de formatação opcionais
//! (bold/italic/underline/strike, link) ou uma referência a anexo.
//!
//! ```text
//! [{"text": "click", "attributes": {"link": "https://x"}},
//!  {"text": "\n",    "attributes": {}},
//!  {"text": "bold text", "attributes": {"bold": true}}]
//! ```
//!
//! Regras:
//! - A ordem dos runs é a ordem de renderização: nada é reordenado,
//!   deduplicado ou mesclado.
//! - `attributes` sempre existe depois do parse (ausente ou `null` vira
//!   [`RunAttributes::default`]) e flags ausentes valem `false`.
//! - Um run pode trazer texto E anexo no wire. Os construtores nunca
//!   produzem essa forma, mas o parse preserva os dois campos.

use crate::error::{ClickUpError, Result};
use crate::types::{lenient, timestamp, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Atributos de formatação de um run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAttributes {
    #[serde(default, deserialize_with = "lenient::null_as_default", skip_serializing_if = "is_false")]
    pub bold: bool,

    #[serde(default, deserialize_with = "lenient::null_as_default", skip_serializing_if = "is_false")]
    pub italic: bool,

    #[serde(default, deserialize_with = "lenient::null_as_default", skip_serializing_if = "is_false")]
    pub underline: bool,

    #[serde(default, deserialize_with = "lenient::null_as_default", skip_serializing_if = "is_false")]
    pub strike: bool,

    #[serde(default, deserialize_with = "lenient::null_as_default", skip_serializing_if = "is_false")]
    pub code: bool,

    /// Destino do hyperlink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(rename = "block-id", default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Atributos que o cliente não interpreta (cor, listas, headers...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flags de formatação usadas por [`CommentRun::formatted`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatting {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl Formatting {
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strike(mut self) -> Self {
        self.strike = true;
        self
    }
}

/// Um trecho do comentário
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Tipo do run (`"attachment"`, `"tag"`, `"emoticon"`...); ausente para texto
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub attributes: RunAttributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<CommentAttachment>,
}

impl CommentRun {
    /// Texto sem formatação
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            kind: None,
            attributes: RunAttributes::default(),
            attachment: None,
        }
    }

    /// Texto com flags de formatação
    pub fn formatted(text: impl Into<String>, formatting: Formatting) -> Self {
        let mut run = Self::plain(text);
        run.attributes.bold = formatting.bold;
        run.attributes.italic = formatting.italic;
        run.attributes.underline = formatting.underline;
        run.attributes.strike = formatting.strike;
        run
    }

    /// Hyperlink
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        let mut run = Self::plain(text);
        run.attributes.link = Some(url.into());
        run
    }

    /// Quebra de linha
    pub fn next_line() -> Self {
        Self::plain("\n")
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}

/// Documento de comentário: runs em ordem de renderização
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentDocument {
    runs: Vec<CommentRun>,
}

impl CommentDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anexa um run ao final
    pub fn push(&mut self, run: CommentRun) {
        self.runs.push(run);
    }

    /// Versão encadeável de [`push`](Self::push)
    pub fn with(mut self, run: CommentRun) -> Self {
        self.runs.push(run);
        self
    }

    pub fn runs(&self) -> &[CommentRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommentRun> {
        self.runs.iter()
    }

    /// Texto corrido do documento (anexos viram o título, quando houver)
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match (&run.text, &run.attachment) {
                (Some(text), _) => text.as_str(),
                (None, Some(attachment)) => attachment.title.as_deref().unwrap_or_default(),
                (None, None) => "",
            })
            .collect()
    }
}

impl FromIterator<CommentRun> for CommentDocument {
    fn from_iter<I: IntoIterator<Item = CommentRun>>(iter: I) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

impl Extend<CommentRun> for CommentDocument {
    fn extend<I: IntoIterator<Item = CommentRun>>(&mut self, iter: I) {
        self.runs.extend(iter);
    }
}

impl IntoIterator for CommentDocument {
    type Item = CommentRun;
    type IntoIter = std::vec::IntoIter<CommentRun>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommentDocument {
    type Item = &'a CommentRun;
    type IntoIter = std::slice::Iter<'a, CommentRun>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

/// Metadados de anexo (somente leitura, chegam apenas em respostas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAttachment {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_small: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_medium: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_large: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_folder: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    /// Task ou comentário dono do anexo
    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Tamanho em bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_comments: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_comments: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_type: Option<i64>,

    /// Task do comentário pai
    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub parent_comment_parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_w_query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_w_host: Option<String>,
}

/// Comentário como devolvido por `GET task/{task_id}/comment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    /// Sequência estruturada de runs
    #[serde(rename = "comment", default, deserialize_with = "lenient::null_as_default")]
    pub runs: CommentDocument,

    /// Texto achatado para exibição; não é garantidamente igual a `runs.plain_text()`
    #[serde(default)]
    pub comment_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub reactions: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date: Option<DateTime<Utc>>,
}

/// `GET task/{task_id}/comment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskComments {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Body de `POST task/{task_id}/comment`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateCommentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,

    #[serde(skip_serializing_if = "CommentDocument::is_empty")]
    pub comment: CommentDocument,

    /// Usuário a quem o comentário é atribuído
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_all: Option<bool>,
}

impl CreateCommentRequest {
    /// Comentário de texto simples
    pub fn text(comment_text: impl Into<String>) -> Self {
        Self {
            comment_text: Some(comment_text.into()),
            ..Default::default()
        }
    }

    /// Comentário rich text
    pub fn document(comment: CommentDocument) -> Self {
        Self {
            comment,
            ..Default::default()
        }
    }

    pub fn assignee(mut self, user_id: i64) -> Self {
        self.assignee = Some(user_id);
        self
    }

    pub fn notify_all(mut self, notify: bool) -> Self {
        self.notify_all = Some(notify);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let has_text = self.comment_text.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_text && self.comment.is_empty() {
            return Err(ClickUpError::Validation(
                "comment_text or comment runs are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Versão do objeto criada junto com o comentário
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date_created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date_updated: Option<DateTime<Utc>>,

    /// Relacionamentos e demais dados da versão
    #[serde(default)]
    pub data: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resposta de `POST task/{task_id}/comment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedComment {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub hist_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<CommentVersion>,
}
