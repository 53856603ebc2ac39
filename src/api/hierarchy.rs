//! Usuário, teams, spaces, folders e lists

use super::{ApiResult, ClickUpApi};
use crate::addressing;
use crate::transport::ApiRequest;
use crate::types::{
    AuthorizedTeams, AuthorizedUser, CreateFolderRequest, CreateListRequest, CreateSpaceRequest, EditListRequest,
    Folder, Folders, List, ListMembers, Lists, Space, Spaces, TeamResponse,
};

impl ClickUpApi {
    /// Usuário dono do token
    ///
    /// # Endpoint da API
    /// `GET /user`
    pub async fn authorized_user(&self) -> ApiResult<AuthorizedUser> {
        self.call(ApiRequest::get(addressing::user())).await
    }

    /// Teams (workspaces) acessíveis pelo token
    ///
    /// # Endpoint da API
    /// `GET /team`
    pub async fn authorized_teams(&self) -> ApiResult<AuthorizedTeams> {
        self.call(ApiRequest::get(addressing::teams())).await
    }

    pub async fn team(&self, team_id: &str) -> ApiResult<TeamResponse> {
        self.call(ApiRequest::get(addressing::team(team_id)?)).await
    }

    // ==================== SPACES ====================

    /// `GET /team/{team_id}/space`
    pub async fn team_spaces(&self, team_id: &str) -> ApiResult<Spaces> {
        self.call(ApiRequest::get(addressing::team_spaces(team_id)?)).await
    }

    /// `POST /team/{team_id}/space`
    pub async fn create_space(&self, team_id: &str, request: &CreateSpaceRequest) -> ApiResult<Space> {
        request.validate()?;
        let address = addressing::team_spaces(team_id)?;
        self.call(ApiRequest::post(address, request)?).await
    }

    // ==================== FOLDERS ====================

    /// `GET /space/{space_id}/folder`
    pub async fn space_folders(&self, space_id: &str) -> ApiResult<Folders> {
        self.call(ApiRequest::get(addressing::space_folders(space_id)?)).await
    }

    /// `POST /space/{space_id}/folder`
    pub async fn create_folder(&self, space_id: &str, request: &CreateFolderRequest) -> ApiResult<Folder> {
        request.validate()?;
        let address = addressing::space_folders(space_id)?;
        self.call(ApiRequest::post(address, request)?).await
    }

    // ==================== LISTS ====================

    /// Busca uma list pelo ID
    ///
    /// # Endpoint da API
    /// `GET /list/{list_id}`
    pub async fn list(&self, list_id: &str) -> ApiResult<List> {
        self.call(ApiRequest::get(addressing::list(list_id)?)).await
    }

    /// Lists de um folder
    pub async fn folder_lists(&self, folder_id: &str) -> ApiResult<Lists> {
        self.call(ApiRequest::get(addressing::folder_lists(folder_id)?)).await
    }

    /// Cria uma list dentro de um folder
    ///
    /// # Endpoint da API
    /// `POST /folder/{folder_id}/list`
    pub async fn create_list(&self, folder_id: &str, request: &CreateListRequest) -> ApiResult<List> {
        request.validate()?;
        let address = addressing::folder_lists(folder_id)?;
        self.call(ApiRequest::post(address, request)?).await
    }

    /// Lists soltas (fora de folder) de um space
    ///
    /// # Endpoint da API
    /// `GET /space/{space_id}/list`
    pub async fn folderless_lists(&self, space_id: &str) -> ApiResult<Lists> {
        self.call(ApiRequest::get(addressing::space_lists(space_id)?)).await
    }

    /// `POST /space/{space_id}/list`
    pub async fn create_folderless_list(&self, space_id: &str, request: &CreateListRequest) -> ApiResult<List> {
        request.validate()?;
        let address = addressing::space_lists(space_id)?;
        self.call(ApiRequest::post(address, request)?).await
    }

    /// `PUT /list/{list_id}`
    pub async fn edit_list(&self, list_id: &str, request: &EditListRequest) -> ApiResult<List> {
        request.validate()?;
        let address = addressing::list(list_id)?;
        self.call(ApiRequest::put(address, request)?).await
    }

    /// Membros com acesso explícito à list
    pub async fn list_members(&self, list_id: &str) -> ApiResult<ListMembers> {
        self.call(ApiRequest::get(addressing::list_members(list_id)?)).await
    }
}
