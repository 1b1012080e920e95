use super::{
    newtypes::{EventId, MarketplaceItemId, NotificationId, PostId},
    user::UserRef,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    #[serde(alias = "_id")]
    pub id: PostId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    #[serde(alias = "_id")]
    pub id: EventId,
    #[serde(default)]
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceItemRef {
    #[serde(alias = "_id")]
    pub id: MarketplaceItemId,
    #[serde(default)]
    pub title: String,
}

/// What a notification is about, together with the payload that kind carries.
///
/// Wire values which are not known to this client decode into [NotificationKind::Other] so that
/// a newer backend never breaks rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Follow,
    Like {
        post: Option<PostRef>,
    },
    Comment {
        post: Option<PostRef>,
        content: Option<String>,
    },
    EventInvite {
        event: Option<EventRef>,
    },
    MarketplaceOffer {
        item: Option<MarketplaceItemRef>,
        message: Option<String>,
    },
    EcoPoints {
        message: Option<String>,
    },
    BadgePurchase {
        message: Option<String>,
    },
    AdminAlert {
        message: Option<String>,
    },
    Warning {
        message: Option<String>,
    },
    Info {
        message: Option<String>,
    },
    Critical {
        message: Option<String>,
    },
    Other {
        kind: String,
        message: Option<String>,
    },
}

impl NotificationKind {
    /// Name of the kind as used in the `type` field of the api.
    pub fn as_str(&self) -> &str {
        use NotificationKind::*;
        match self {
            Follow => "follow",
            Like { .. } => "like",
            Comment { .. } => "comment",
            EventInvite { .. } => "event_invite",
            MarketplaceOffer { .. } => "marketplace_offer",
            EcoPoints { .. } => "eco_points",
            BadgePurchase { .. } => "badge_purchase",
            AdminAlert { .. } => "admin-alert",
            Warning { .. } => "warning",
            Info { .. } => "info",
            Critical { .. } => "critical",
            Other { kind, .. } => kind,
        }
    }

    /// System notifications are generated by the platform and have no sender.
    pub fn is_system(&self) -> bool {
        use NotificationKind::*;
        !matches!(
            self,
            Follow | Like { .. } | Comment { .. } | EventInvite { .. } | MarketplaceOffer { .. }
        )
    }

    pub fn message(&self) -> Option<&str> {
        use NotificationKind::*;
        match self {
            Follow | Like { .. } | EventInvite { .. } => None,
            Comment { content, .. } => content.as_deref(),
            MarketplaceOffer { message, .. }
            | EcoPoints { message }
            | BadgePurchase { message }
            | AdminAlert { message }
            | Warning { message }
            | Info { message }
            | Critical { message }
            | Other { message, .. } => message.as_deref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ApiNotification", into = "ApiNotification")]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender: Option<UserRef>,
}

/// Flat json representation as sent by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotification {
    #[serde(alias = "_id")]
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_item: Option<MarketplaceItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ApiNotification> for Notification {
    fn from(api: ApiNotification) -> Self {
        use NotificationKind::*;
        let message = api.message.or(api.content.clone());
        let kind = match api.kind.as_str() {
            "follow" => Follow,
            "like" => Like { post: api.post },
            "comment" => Comment {
                post: api.post,
                content: api.content,
            },
            "event_invite" => EventInvite { event: api.event },
            "marketplace_offer" => MarketplaceOffer {
                item: api.marketplace_item,
                message,
            },
            "eco_points" => EcoPoints { message },
            "badge_purchase" => BadgePurchase { message },
            "admin-alert" => AdminAlert { message },
            "warning" => Warning { message },
            "info" => Info { message },
            "critical" => Critical { message },
            _ => Other {
                kind: api.kind.clone(),
                message,
            },
        };
        Notification {
            id: api.id,
            kind,
            is_read: api.is_read,
            created_at: api.created_at,
            sender: api.sender,
        }
    }
}

impl From<Notification> for ApiNotification {
    fn from(notification: Notification) -> Self {
        use NotificationKind::*;
        let mut api = ApiNotification {
            id: notification.id,
            kind: notification.kind.as_str().to_string(),
            is_read: notification.is_read,
            created_at: notification.created_at,
            sender: notification.sender,
            post: None,
            event: None,
            marketplace_item: None,
            content: None,
            message: None,
        };
        match notification.kind {
            Follow => {}
            Like { post } => api.post = post,
            Comment { post, content } => {
                api.post = post;
                api.content = content;
            }
            EventInvite { event } => api.event = event,
            MarketplaceOffer { item, message } => {
                api.marketplace_item = item;
                api.message = message;
            }
            EcoPoints { message }
            | BadgePurchase { message }
            | AdminAlert { message }
            | Warning { message }
            | Info { message }
            | Critical { message }
            | Other { message, .. } => api.message = message,
        }
        api
    }
}
