//! Tasks e custom fields
//!
//! Toda operação sobre uma task existente recebe um [`TaskRef`]: ID canônico
//! ou custom ID + team. O endereço (incluindo `custom_task_ids=true&team_id=`)
//! é resolvido em um único lugar, [`TaskRef::address`].

use super::{ApiResult, ClickUpApi};
use crate::addressing::{self, ListTasksQuery, TaskRef, TeamTasksQuery};
use crate::envelope::ResponseSuccess;
use crate::error::ClickUpError;
use crate::transport::ApiRequest;
use crate::types::{
    AccessibleCustomFields, CreateTaskRequest, CustomFieldValue, EditTaskRequest, SetCustomFieldRequest, Task,
    TaskUpdate, Tasks,
};
use tracing::{error, info};

impl ClickUpApi {
    /// Busca uma task
    ///
    /// # Endpoint da API
    /// `GET /task/{task_id}` (ou `?custom_task_ids=true&team_id=...` para custom IDs)
    ///
    /// # Exemplo
    /// ```rust,ignore
    /// let task = api.task(&TaskRef::custom("DEV-42", "9011")?).await?;
    /// ```
    pub async fn task(&self, task: &TaskRef) -> ApiResult<Task> {
        self.call(ApiRequest::get(task.address(&[])?)).await
    }

    /// Tasks filtradas de um team (workspace)
    ///
    /// # Endpoint da API
    /// `GET /team/{team_id}/task`
    ///
    /// Filtro por `space_ids[]` não é oferecido: a API responde `ITEMV2_003`.
    pub async fn team_tasks(&self, team_id: &str, query: &TeamTasksQuery) -> ApiResult<Tasks> {
        self.call(ApiRequest::get(addressing::team_tasks(team_id, query)?)).await
    }

    /// `GET /list/{list_id}/task`
    pub async fn list_tasks(&self, list_id: &str, query: &ListTasksQuery) -> ApiResult<Tasks> {
        self.call(ApiRequest::get(addressing::list_tasks(list_id, query)?)).await
    }

    /// Cria uma task na list
    ///
    /// # Endpoint da API
    /// `POST /list/{list_id}/task`
    pub async fn create_task(&self, list_id: &str, request: &CreateTaskRequest) -> ApiResult<Task> {
        request.validate()?;
        let address = addressing::list_tasks(list_id, &ListTasksQuery::default())?;
        let response = self.call::<Task>(ApiRequest::post(address, request)?).await?;

        if let Some(task) = response.success() {
            info!("✅ Task criada: {} ({})", task.name, task.id);
        }
        Ok(response)
    }

    /// Edição completa de task: **bloqueada**
    ///
    /// Enviar o payload completo sobrescreve campos não informados e danifica
    /// a task. Sempre retorna [`ClickUpError::Disabled`] sem fazer I/O; use
    /// [`update_task`](Self::update_task).
    pub async fn edit_task(&self, task: &TaskRef, _request: &EditTaskRequest) -> ApiResult<Task> {
        error!("⛔ edit_task bloqueado para a task {}", task.id());
        Err(ClickUpError::Disabled {
            operation: "edit_task",
            reason: "whole-task edit damages the task; use update_task (partial update) instead",
        })
    }

    /// Atualização parcial: só os campos definidos em `update` são enviados
    ///
    /// # Endpoint da API
    /// `PUT /task/{task_id}`
    pub async fn update_task(&self, task: &TaskRef, update: &TaskUpdate) -> ApiResult<Task> {
        update.validate()?;
        let address = task.address(&[])?;
        self.call(ApiRequest::put(address, update)?).await
    }

    /// Define o valor de um custom field da task
    ///
    /// # Endpoint da API
    /// `POST /task/{task_id}/field/{field_id}`
    ///
    /// # Argumentos
    /// * `task` - Task alvo
    /// * `field_id` - UUID do custom field
    /// * `value` - Valor já no formato do tipo do campo (texto, número, opção,
    ///   delta `{add, rem}` para users/relationships...)
    pub async fn set_custom_field(
        &self,
        task: &TaskRef,
        field_id: &str,
        value: impl Into<CustomFieldValue>,
    ) -> ApiResult<ResponseSuccess> {
        let field_id = addressing::require("field_id", field_id)?;
        let address = task.address(&["field", field_id])?;
        let body = SetCustomFieldRequest { value: value.into() };
        self.call(ApiRequest::post(address, &body)?).await
    }

    /// Custom fields disponíveis na list
    ///
    /// # Endpoint da API
    /// `GET /list/{list_id}/field`
    pub async fn accessible_custom_fields(&self, list_id: &str) -> ApiResult<AccessibleCustomFields> {
        self.call(ApiRequest::get(addressing::list_fields(list_id)?)).await
    }

    /// `DELETE /task/{task_id}`
    pub async fn delete_task(&self, task: &TaskRef) -> ApiResult<ResponseSuccess> {
        let response = self.call(ApiRequest::delete(task.address(&[])?)).await?;
        if response.is_success() {
            info!("🗑️ Task removida: {}", task.id());
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::addressing::CustomFieldFilter;
    use crate::types::{Priority, RelationshipDelta, UserDelta};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn task_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "custom_id": "DEV-42",
            "name": "Corrigir login",
            "status": {"status": "open", "color": "#d3d3d3", "type": "open"},
            "priority": {"id": "2", "priority": "high"},
            "assignees": null,
            "custom_fields": [],
            "date_created": "1567780450202"
        })
    }

    #[tokio::test]
    async fn test_task_by_custom_id_carries_team_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/task/DEV-42")
                    .query_param("custom_task_ids", "true")
                    .query_param("team_id", "9011");
                then.status(200).json_body(task_json("9hx"));
            })
            .await;

        let task_ref = TaskRef::custom("DEV-42", "9011").unwrap();
        let response = testing::api(&server).task(&task_ref).await.unwrap();

        mock.assert_async().await;
        let task = response.success().unwrap();
        assert_eq!(task.id, "9hx");
        assert_eq!(task.priority, Some(Priority::High));
        assert!(task.assignees.is_empty());
        assert!(task.date_created.is_some());
    }

    #[tokio::test]
    async fn test_task_by_canonical_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/task/9hx");
                then.status(200).json_body(task_json("9hx"));
            })
            .await;

        let response = testing::api(&server).task(&TaskRef::canonical("9hx")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.success().unwrap().custom_id.as_deref(), Some("DEV-42"));
    }

    #[tokio::test]
    async fn test_team_tasks_renders_custom_field_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/team/9011/task")
                    .query_param("page", "0")
                    .query_param(
                        "custom_fields",
                        r#"[{"field_id":"f1","operator":"=","value":"abc"}]"#,
                    );
                then.status(200).json_body(json!({"tasks": [task_json("9hx")], "last_page": true}));
            })
            .await;

        let query = TeamTasksQuery::default()
            .page(0)
            .custom_field(CustomFieldFilter::equals("f1", "abc"));
        let response = testing::api(&server).team_tasks("9011", &query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.success().unwrap().tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_create_task_posts_to_list() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/list/901/task")
                    .json_body_partial(r#"{"name": "Corrigir login", "priority": 2, "assignees": [183]}"#);
                then.status(200).json_body(task_json("9hx"));
            })
            .await;

        let request = CreateTaskRequest::new("Corrigir login")
            .priority(Priority::High)
            .assignee(183);
        let response = testing::api(&server).create_task("901", &request).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_edit_task_is_disabled_without_io() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/task/9hx");
                then.status(200).json_body(task_json("9hx"));
            })
            .await;

        let result = testing::api(&server)
            .edit_task(&TaskRef::canonical("9hx"), &EditTaskRequest::default())
            .await;

        match result {
            Err(error @ ClickUpError::Disabled { .. }) => assert!(error.is_fatal()),
            other => panic!("expected Disabled, got {:?}", other.map(|r| r.status())),
        }
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_update_task_sends_only_set_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/task/DEV-42")
                    .query_param("custom_task_ids", "true")
                    .query_param("team_id", "9011")
                    .json_body(json!({
                        "status": "in progress",
                        "assignees": {"add": [183], "rem": [7]}
                    }));
                then.status(200).json_body(task_json("9hx"));
            })
            .await;

        let update = TaskUpdate::new()
            .status("in progress")
            .assignees(UserDelta::add([183]).and_remove(7));
        let task_ref = TaskRef::custom("DEV-42", "9011").unwrap();
        let response = testing::api(&server).update_task(&task_ref, &update).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let server = MockServer::start_async().await;
        let api = testing::api(&server);

        let result = api.update_task(&TaskRef::canonical("9hx"), &TaskUpdate::new()).await;
        assert!(matches!(result, Err(ClickUpError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_relationship_custom_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/task/9hx/field/5dc86497-098d-4bb0-87d6-cf28e43812e7")
                    .json_body(json!({"value": {"add": ["abc"], "rem": ["def"]}}));
                then.status(200).json_body(json!({}));
            })
            .await;

        let delta = RelationshipDelta {
            add: vec!["abc".to_string()],
            rem: vec!["def".to_string()],
        };
        let response = testing::api(&server)
            .set_custom_field(&TaskRef::canonical("9hx"), "5dc86497-098d-4bb0-87d6-cf28e43812e7", delta)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert!(response.success().is_some());
    }

    #[tokio::test]
    async fn test_set_custom_field_requires_field_id() {
        let server = MockServer::start_async().await;
        let result = testing::api(&server)
            .set_custom_field(&TaskRef::canonical("9hx"), "", "value")
            .await;
        assert!(matches!(result, Err(ClickUpError::Validation(ref m)) if m == "field_id is required"));
    }

    #[tokio::test]
    async fn test_delete_task_with_no_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/task/9hx");
                then.status(204);
            })
            .await;

        let response = testing::api(&server).delete_task(&TaskRef::canonical("9hx")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), 204);
        assert!(!response.is_success());
        assert!(response.success().is_none());
        assert!(response.error().is_none());
    }

    #[tokio::test]
    async fn test_accessible_custom_fields() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/list/901/field");
                then.status(200).json_body(json!({
                    "fields": [{
                        "id": "f1",
                        "name": "Cliente",
                        "type": "drop_down",
                        "type_config": {"options": [{"id": "o1", "name": "Acme", "orderindex": 0}]}
                    }]
                }));
            })
            .await;

        let response = testing::api(&server).accessible_custom_fields("901").await.unwrap();

        let fields = &response.success().unwrap().fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type.as_deref(), Some("drop_down"));
    }
}
