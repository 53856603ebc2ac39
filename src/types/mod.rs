//! Tipos de request/response da API v2
//!
//! Só é tipado o que importa para a corretude das chamadas; o restante
//! passa adiante como `serde_json::Value` (campos `extra`).

pub(crate) mod lenient;
pub mod timestamp;

pub mod custom_field;
pub mod hierarchy;
pub mod priority;
pub mod task;
pub mod user;
pub mod webhook;

pub use custom_field::{
    AccessibleCustomFields, CustomField, CustomFieldEntry, CustomFieldValue, FieldOption, SetCustomFieldRequest,
    TypeConfig,
};
pub use hierarchy::{
    CreateFolderRequest, CreateListRequest, CreateSpaceRequest, EditListRequest, Folder, Folders, List, Lists,
    ResourceRef, Space, Spaces,
};
pub use priority::Priority;
pub use task::{CreateTaskRequest, EditTaskRequest, RelationshipDelta, Tag, Task, TaskStatus, TaskUpdate, Tasks};
pub use user::{AuthorizedTeams, AuthorizedUser, ListMembers, Team, TeamMember, TeamResponse, User, UserDelta};
pub use webhook::{
    verify_signature, CreateWebhookRequest, EditWebhookRequest, HistoryItem, Webhook, WebhookEvent, WebhookHealth,
    WebhookResponse, WebhookScope, Webhooks,
};
