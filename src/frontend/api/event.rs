use super::ApiClient;
use crate::{
    common::{newtypes::EventId, Event, EventForm},
    frontend::utils::errors::FrontendResult,
};
use async_trait::async_trait;
use reqwest::Method;

/// Backend operations needed by the event store.
#[cfg_attr(not(target_family = "wasm"), async_trait)]
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
pub trait EventApi: Send + Sync {
    async fn list_events(&self) -> FrontendResult<Vec<Event>>;
    async fn get_event(&self, id: &EventId) -> FrontendResult<Event>;
    async fn create_event(&self, form: &EventForm) -> FrontendResult<Event>;
    async fn update_event(&self, id: &EventId, form: &EventForm) -> FrontendResult<Event>;
    async fn delete_event(&self, id: &EventId) -> FrontendResult<()>;
    async fn join_event(&self, id: &EventId) -> FrontendResult<Event>;
    async fn leave_event(&self, id: &EventId) -> FrontendResult<Event>;
    /// Marks the event as completed, the backend then awards points to the participants.
    async fn complete_event(&self, id: &EventId) -> FrontendResult<Event>;
}

#[cfg_attr(not(target_family = "wasm"), async_trait)]
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
impl EventApi for ApiClient {
    async fn list_events(&self) -> FrontendResult<Vec<Event>> {
        self.get("/events").await
    }

    async fn get_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.get(&format!("/events/{id}")).await
    }

    async fn create_event(&self, form: &EventForm) -> FrontendResult<Event> {
        self.post("/events", Some(form)).await
    }

    async fn update_event(&self, id: &EventId, form: &EventForm) -> FrontendResult<Event> {
        self.put(&format!("/events/{id}"), Some(form)).await
    }

    async fn delete_event(&self, id: &EventId) -> FrontendResult<()> {
        self.send_empty(Method::DELETE, &format!("/events/{id}"), None::<()>).await
    }

    async fn join_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.post(&format!("/events/{id}/join"), None::<()>).await
    }

    async fn leave_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.post(&format!("/events/{id}/leave"), None::<()>).await
    }

    async fn complete_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.post(&format!("/events/{id}/complete"), None::<()>).await
    }
}
