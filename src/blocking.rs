//! Fachada síncrona
//!
//! Envolve um [`ClickUpApi`] e um runtime tokio current-thread próprio. Retry,
//! classificação e validação continuam no cliente async; aqui só há
//! `block_on`.
//!
//! ⚠️ Não chame de dentro de um runtime tokio (o `block_on` entra em pânico).

use crate::addressing::{ListTasksQuery, TaskRef, TeamTasksQuery};
use crate::api::{ApiResult, ClickUpApi};
use crate::auth::OAuthCode;
use crate::comments::{CreateCommentRequest, CreatedComment, TaskComments};
use crate::config::ClientConfig;
use crate::envelope::ResponseSuccess;
use crate::error::{ClickUpError, Result};
use crate::types::{
    AccessibleCustomFields, AuthorizedTeams, AuthorizedUser, CreateFolderRequest, CreateListRequest,
    CreateSpaceRequest, CreateTaskRequest, CreateWebhookRequest, CustomFieldValue, EditListRequest, EditTaskRequest,
    EditWebhookRequest, Folder, Folders, List, ListMembers, Lists, Space, Spaces, Task, TaskUpdate, Tasks,
    TeamResponse, WebhookResponse, Webhooks,
};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Cliente bloqueante da API v2 do ClickUp
#[derive(Debug, Clone)]
pub struct BlockingClickUpApi {
    inner: ClickUpApi,
    runtime: Arc<Runtime>,
}

fn runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ClickUpError::Config(format!("Failed to create tokio runtime: {}", e)))
}

impl BlockingClickUpApi {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(token))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: ClickUpApi::with_config(config)?,
            runtime: Arc::new(runtime()?),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Troca de código OAuth, bloqueante
    pub fn exchange_code(config: ClientConfig, code: &OAuthCode) -> Result<Self> {
        let runtime = runtime()?;
        let inner = runtime.block_on(ClickUpApi::exchange_code_with_config(config, code))?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// Cliente async compartilhando conexão e credencial
    pub fn inner(&self) -> &ClickUpApi {
        &self.inner
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    // ==================== USUÁRIO / HIERARQUIA ====================

    pub fn authorized_user(&self) -> ApiResult<AuthorizedUser> {
        self.block_on(self.inner.authorized_user())
    }

    pub fn authorized_teams(&self) -> ApiResult<AuthorizedTeams> {
        self.block_on(self.inner.authorized_teams())
    }

    pub fn team(&self, team_id: &str) -> ApiResult<TeamResponse> {
        self.block_on(self.inner.team(team_id))
    }

    pub fn team_spaces(&self, team_id: &str) -> ApiResult<Spaces> {
        self.block_on(self.inner.team_spaces(team_id))
    }

    pub fn create_space(&self, team_id: &str, request: &CreateSpaceRequest) -> ApiResult<Space> {
        self.block_on(self.inner.create_space(team_id, request))
    }

    pub fn space_folders(&self, space_id: &str) -> ApiResult<Folders> {
        self.block_on(self.inner.space_folders(space_id))
    }

    pub fn create_folder(&self, space_id: &str, request: &CreateFolderRequest) -> ApiResult<Folder> {
        self.block_on(self.inner.create_folder(space_id, request))
    }

    pub fn list(&self, list_id: &str) -> ApiResult<List> {
        self.block_on(self.inner.list(list_id))
    }

    pub fn folder_lists(&self, folder_id: &str) -> ApiResult<Lists> {
        self.block_on(self.inner.folder_lists(folder_id))
    }

    pub fn create_list(&self, folder_id: &str, request: &CreateListRequest) -> ApiResult<List> {
        self.block_on(self.inner.create_list(folder_id, request))
    }

    pub fn folderless_lists(&self, space_id: &str) -> ApiResult<Lists> {
        self.block_on(self.inner.folderless_lists(space_id))
    }

    pub fn create_folderless_list(&self, space_id: &str, request: &CreateListRequest) -> ApiResult<List> {
        self.block_on(self.inner.create_folderless_list(space_id, request))
    }

    pub fn edit_list(&self, list_id: &str, request: &EditListRequest) -> ApiResult<List> {
        self.block_on(self.inner.edit_list(list_id, request))
    }

    pub fn list_members(&self, list_id: &str) -> ApiResult<ListMembers> {
        self.block_on(self.inner.list_members(list_id))
    }

    // ==================== TASKS ====================

    pub fn task(&self, task: &TaskRef) -> ApiResult<Task> {
        self.block_on(self.inner.task(task))
    }

    pub fn team_tasks(&self, team_id: &str, query: &TeamTasksQuery) -> ApiResult<Tasks> {
        self.block_on(self.inner.team_tasks(team_id, query))
    }

    pub fn list_tasks(&self, list_id: &str, query: &ListTasksQuery) -> ApiResult<Tasks> {
        self.block_on(self.inner.list_tasks(list_id, query))
    }

    pub fn create_task(&self, list_id: &str, request: &CreateTaskRequest) -> ApiResult<Task> {
        self.block_on(self.inner.create_task(list_id, request))
    }

    /// Sempre [`ClickUpError::Disabled`]; ver [`ClickUpApi::edit_task`]
    pub fn edit_task(&self, task: &TaskRef, request: &EditTaskRequest) -> ApiResult<Task> {
        self.block_on(self.inner.edit_task(task, request))
    }

    pub fn update_task(&self, task: &TaskRef, update: &TaskUpdate) -> ApiResult<Task> {
        self.block_on(self.inner.update_task(task, update))
    }

    pub fn set_custom_field(
        &self,
        task: &TaskRef,
        field_id: &str,
        value: impl Into<CustomFieldValue>,
    ) -> ApiResult<ResponseSuccess> {
        self.block_on(self.inner.set_custom_field(task, field_id, value))
    }

    pub fn accessible_custom_fields(&self, list_id: &str) -> ApiResult<AccessibleCustomFields> {
        self.block_on(self.inner.accessible_custom_fields(list_id))
    }

    pub fn delete_task(&self, task: &TaskRef) -> ApiResult<ResponseSuccess> {
        self.block_on(self.inner.delete_task(task))
    }

    // ==================== COMENTÁRIOS ====================

    pub fn task_comments(&self, task: &TaskRef) -> ApiResult<TaskComments> {
        self.block_on(self.inner.task_comments(task))
    }

    pub fn create_task_comment(&self, task: &TaskRef, request: &CreateCommentRequest) -> ApiResult<CreatedComment> {
        self.block_on(self.inner.create_task_comment(task, request))
    }

    // ==================== WEBHOOKS ====================

    pub fn team_webhooks(&self, team_id: &str) -> ApiResult<Webhooks> {
        self.block_on(self.inner.team_webhooks(team_id))
    }

    pub fn create_webhook(&self, team_id: &str, request: &CreateWebhookRequest) -> ApiResult<WebhookResponse> {
        self.block_on(self.inner.create_webhook(team_id, request))
    }

    pub fn edit_webhook(&self, webhook_id: &str, request: &EditWebhookRequest) -> ApiResult<WebhookResponse> {
        self.block_on(self.inner.edit_webhook(webhook_id, request))
    }

    pub fn delete_webhook(&self, webhook_id: &str) -> ApiResult<ResponseSuccess> {
        self.block_on(self.inner.delete_webhook(webhook_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RetryPolicy;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn blocking_api(server: &MockServer) -> BlockingClickUpApi {
        let config = ClientConfig::new("pk_test")
            .base_url(server.base_url())
            .retry(RetryPolicy {
                max_retries: 1,
                cooldown: Duration::from_millis(10),
            });
        BlockingClickUpApi::with_config(config).unwrap()
    }

    #[test]
    fn test_blocking_list_tasks() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/list/901/task")
                .query_param("include_closed", "true")
                .header("authorization", "pk_test");
            then.status(200).json_body(json!({
                "tasks": [{"id": "9hx", "name": "Corrigir login"}],
                "last_page": true
            }));
        });

        let query = ListTasksQuery::default().include_closed(true);
        let response = blocking_api(&server).list_tasks("901", &query).unwrap();

        mock.assert();
        let tasks = response.success().unwrap();
        assert_eq!(tasks.tasks[0].id, "9hx");
    }

    #[test]
    fn test_blocking_shares_retry_logic() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(429).json_body(json!({"err": "Rate limit reached", "ECODE": "APP_002"}));
        });

        let response = blocking_api(&server).authorized_user().unwrap();

        mock.assert_hits(2);
        assert_eq!(response.status(), 429);
        assert_eq!(response.error().unwrap().code.as_deref(), Some("APP_002"));
    }

    #[test]
    fn test_blocking_edit_task_is_disabled() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/task/9hx");
            then.status(200).json_body(json!({"id": "9hx", "name": "Corrigir login"}));
        });

        let result = blocking_api(&server).edit_task(&TaskRef::canonical("9hx"), &EditTaskRequest::default());

        assert!(matches!(result, Err(ClickUpError::Disabled { operation: "edit_task", .. })));
        mock.assert_hits(0);
    }
}
