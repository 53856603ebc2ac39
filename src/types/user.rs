//! Usuários, teams (workspaces) e membros de lista

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Usuário do ClickUp
///
/// Campos de perfil que o cliente não usa ficam em `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Cor associada ao usuário (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(
        default,
        rename = "profilePicture",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Cria um usuário apenas com ID (mínimo necessário)
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            email: None,
            color: None,
            profile_picture: None,
            initials: None,
            extra: Map::new(),
        }
    }
}

/// `GET user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    pub user: User,
}

/// Membro de um team (workspace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user: User,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<User>,
}

/// Team (workspace) do ClickUp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "super::lenient::id")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub members: Vec<TeamMember>,
}

/// `GET team`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedTeams {
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// `GET team/{team_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team: Team,
}

/// `GET list/{list_id}/member`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMembers {
    #[serde(default)]
    pub members: Vec<User>,
}

/// Delta de usuários para updates parciais (`{"add": [...], "rem": [...]}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDelta {
    #[serde(default)]
    pub add: Vec<i64>,

    #[serde(default)]
    pub rem: Vec<i64>,
}

impl UserDelta {
    pub fn add(user_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            add: user_ids.into_iter().collect(),
            rem: Vec::new(),
        }
    }

    pub fn remove(user_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            add: Vec::new(),
            rem: user_ids.into_iter().collect(),
        }
    }

    /// Adiciona um usuário (ignora duplicados)
    pub fn and_add(mut self, user_id: i64) -> Self {
        if !self.add.contains(&user_id) {
            self.add.push(user_id);
        }
        self
    }

    /// Remove um usuário (ignora duplicados)
    pub fn and_remove(mut self, user_id: i64) -> Self {
        if !self.rem.contains(&user_id) {
            self.rem.push(user_id);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.rem.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 183,
            "username": "jane",
            "profilePicture": "https://img/p.png",
            "week_start_day": 1
        }))
        .unwrap();

        assert_eq!(user.id, 183);
        assert_eq!(user.profile_picture.as_deref(), Some("https://img/p.png"));
        assert_eq!(user.extra["week_start_day"], 1);

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["profilePicture"], "https://img/p.png");
        assert_eq!(back["week_start_day"], 1);
    }

    #[test]
    fn test_teams_with_numeric_id() {
        let teams: AuthorizedTeams = serde_json::from_value(json!({
            "teams": [{"id": 9011, "name": "Acme", "members": null}]
        }))
        .unwrap();

        assert_eq!(teams.teams[0].id, "9011");
        assert!(teams.teams[0].members.is_empty());
    }

    #[test]
    fn test_user_delta() {
        let delta = UserDelta::add([1, 2]).and_add(2).and_remove(7);
        assert_eq!(serde_json::to_value(&delta).unwrap(), json!({"add": [1, 2], "rem": [7]}));
        assert!(!delta.is_empty());
        assert!(UserDelta::default().is_empty());
    }
}
