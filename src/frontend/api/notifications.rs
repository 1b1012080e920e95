use super::ApiClient;
use crate::{
    common::{newtypes::NotificationId, Notification},
    frontend::utils::errors::FrontendResult,
};
use async_trait::async_trait;
use reqwest::Method;

/// Backend operations needed by the notification store.
#[cfg_attr(not(target_family = "wasm"), async_trait)]
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
pub trait NotificationApi: Send + Sync {
    async fn list_notifications(&self) -> FrontendResult<Vec<Notification>>;
    async fn mark_notification_read(&self, id: &NotificationId) -> FrontendResult<()>;
    async fn mark_all_notifications_read(&self) -> FrontendResult<()>;
    async fn delete_notification(&self, id: &NotificationId) -> FrontendResult<()>;
}

#[cfg_attr(not(target_family = "wasm"), async_trait)]
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
impl NotificationApi for ApiClient {
    async fn list_notifications(&self) -> FrontendResult<Vec<Notification>> {
        self.get("/notifications").await
    }

    async fn mark_notification_read(&self, id: &NotificationId) -> FrontendResult<()> {
        self.send_empty(Method::PUT, &format!("/notifications/{id}/read"), None::<()>).await
    }

    async fn mark_all_notifications_read(&self) -> FrontendResult<()> {
        self.send_empty(Method::PUT, "/notifications/read-all", None::<()>).await
    }

    async fn delete_notification(&self, id: &NotificationId) -> FrontendResult<()> {
        self.send_empty(Method::DELETE, &format!("/notifications/{id}"), None::<()>).await
    }
}
