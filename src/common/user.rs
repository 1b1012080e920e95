use super::newtypes::UserId;
use serde::{Deserialize, Serialize};

/// Minimal view of another user, as embedded in notifications and events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(alias = "username", alias = "displayName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
