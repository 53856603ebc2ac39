use super::{ApiResult, ClickUpApi};
use crate::addressing::TaskRef;
use crate::comments::{CreateCommentRequest, CreatedComment, TaskComments};
use crate::transport::ApiRequest;
use tracing::info;

impl ClickUpApi {
    /// Comentários da task, com os runs de rich text preservados
    ///
    /// # Endpoint da API
    /// `GET /task/{task_id}/comment`
    pub async fn task_comments(&self, task: &TaskRef) -> ApiResult<TaskComments> {
        self.call(ApiRequest::get(task.address(&["comment"])?)).await
    }

    /// Cria um comentário (texto simples ou [`CommentDocument`](crate::CommentDocument))
    ///
    /// # Endpoint da API
    /// `POST /task/{task_id}/comment`
    ///
    /// # Exemplo
    /// ```rust,ignore
    /// let doc = CommentDocument::new()
    ///     .with(CommentRun::plain("Ver "))
    ///     .with(CommentRun::link("PR #12", "https://github.com/acme/app/pull/12"));
    /// api.create_task_comment(&TaskRef::canonical("9hx"), &CreateCommentRequest::document(doc)).await?;
    /// ```
    pub async fn create_task_comment(
        &self,
        task: &TaskRef,
        request: &CreateCommentRequest,
    ) -> ApiResult<CreatedComment> {
        request.validate()?;
        let address = task.address(&["comment"])?;
        let response = self.call::<CreatedComment>(ApiRequest::post(address, request)?).await?;

        if let Some(created) = response.success() {
            info!("💬 Comentário {} criado na task {}", created.id, task.id());
        }
        Ok(response)
    }
}
