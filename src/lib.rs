//! # clickup-rest
//!
//! Cliente tipado da API REST v2 do ClickUp.
//!
//! - Toda chamada devolve [`ApiResponse`]: status HTTP final + payload de
//!   sucesso (somente status 200) **ou** payload de erro da API. Erros da
//!   aplicação ClickUp são dado, não `Err`.
//! - HTTP 429 é repetido até 5 vezes, com espera fixa de 20s entre tentativas
//!   ([`RetryPolicy`]). Qualquer outro status encerra na hora.
//! - Tasks são endereçadas por [`TaskRef`]: ID canônico ou custom ID + team.
//! - Comentários rich text são sequências ordenadas de [`CommentRun`].
//! - Edição completa de task está bloqueada; use [`TaskUpdate`].
//!
//! ```rust,ignore
//! use clickup_rest::{ClickUpApi, CreateTaskRequest, Priority};
//!
//! let api = ClickUpApi::new("pk_your_token")?;
//! let request = CreateTaskRequest::new("Corrigir login").priority(Priority::High);
//! let response = api.create_task("901", &request).await?;
//! if let Some(task) = response.success() {
//!     println!("{}", task.id);
//! }
//! ```

pub mod addressing;
pub mod api;
pub mod auth;
pub mod blocking;
pub mod comments;
pub mod config;
pub mod envelope;
pub mod error;
pub mod transport;
pub mod types;

pub use addressing::{CustomFieldFilter, FilterOperator, ListTasksQuery, ResourceAddress, TaskRef, TeamTasksQuery};
pub use api::{ApiResult, ClickUpApi};
pub use auth::{Credential, OAuthCode, TokenResponse};
pub use blocking::BlockingClickUpApi;
pub use comments::{
    Comment, CommentAttachment, CommentDocument, CommentRun, CreateCommentRequest, CreatedComment, Formatting,
    RunAttributes, TaskComments,
};
pub use config::ClientConfig;
pub use envelope::{ApiFailure, ApiResponse, ResponseError, ResponseSuccess};
pub use error::{ClickUpError, Result};
pub use transport::{cancel_pair, CancelHandle, CancelSignal, RetryPolicy};
pub use types::*;
