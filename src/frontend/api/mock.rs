//! In-memory backend for tests, records every call it receives.

use super::{EventApi, NotificationApi};
use crate::{
    common::{
        newtypes::{EventId, NotificationId, UserId},
        user::UserRef,
        Event,
        EventForm,
        EventStatus,
        Notification,
        NotificationKind,
    },
    frontend::utils::errors::{FrontendError, FrontendResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::{
    collections::{HashSet, VecDeque},
    sync::{Mutex, MutexGuard},
};
use tokio::sync::oneshot;

pub(crate) const VIEWER: &str = "me";

#[derive(Default)]
pub(crate) struct MockApi {
    notifications: Mutex<Vec<Notification>>,
    events: Mutex<Vec<Event>>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
    held_fetches: Mutex<VecDeque<oneshot::Receiver<Vec<Notification>>>>,
    held_event_fetches: Mutex<VecDeque<oneshot::Receiver<Vec<Event>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub(crate) fn viewer() -> UserRef {
    UserRef {
        id: UserId::from(VIEWER),
        name: VIEWER.to_string(),
        avatar: None,
    }
}

pub(crate) fn notification(id: &str, is_read: bool) -> Notification {
    Notification {
        id: NotificationId::from(id),
        kind: NotificationKind::Follow,
        is_read,
        created_at: DateTime::<Utc>::default() + Duration::days(19_000),
        sender: Some(UserRef {
            id: UserId::from("u-alice"),
            name: "alice".to_string(),
            avatar: None,
        }),
    }
}

impl MockApi {
    pub(crate) fn with_notifications(notifications: Vec<Notification>) -> Self {
        let api = Self::default();
        api.set_notifications(notifications);
        api
    }

    pub(crate) fn with_events(events: Vec<Event>) -> Self {
        let api = Self::default();
        api.set_events(events);
        api
    }

    pub(crate) fn set_events(&self, events: Vec<Event>) {
        *lock(&self.events) = events;
    }

    pub(crate) fn set_notifications(&self, notifications: Vec<Notification>) {
        *lock(&self.notifications) = notifications;
    }

    pub(crate) fn server_notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    pub(crate) fn server_event(&self, id: &str) -> Option<Event> {
        lock(&self.events).iter().find(|e| e.id.0 == id).cloned()
    }

    /// Makes every following call of `op` fail with a server error.
    pub(crate) fn fail(&self, op: &'static str) {
        lock(&self.failing).insert(op);
    }

    pub(crate) fn recover(&self, op: &'static str) {
        lock(&self.failing).remove(op);
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == op).count()
    }

    /// The next list request waits until a response is sent through the returned channel.
    pub(crate) fn hold_next_fetch(&self) -> oneshot::Sender<Vec<Notification>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.held_fetches).push_back(rx);
        tx
    }

    /// Same as [Self::hold_next_fetch] for the event list.
    pub(crate) fn hold_next_event_fetch(&self) -> oneshot::Sender<Vec<Event>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.held_event_fetches).push_back(rx);
        tx
    }

    fn record(&self, op: &'static str) -> FrontendResult<()> {
        lock(&self.calls).push(op);
        if lock(&self.failing).contains(op) {
            return Err(FrontendError::ErrorResponse {
                status: 500,
                message: format!("{op} failed"),
            });
        }
        Ok(())
    }

    fn modify_event<F>(&self, id: &EventId, f: F) -> FrontendResult<Event>
    where
        F: FnOnce(&mut Event),
    {
        let mut events = lock(&self.events);
        let event = events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or(FrontendError::ErrorResponse {
                status: 404,
                message: "Event not found".to_string(),
            })?;
        f(event);
        Ok(event.clone())
    }
}

#[async_trait]
impl NotificationApi for MockApi {
    async fn list_notifications(&self) -> FrontendResult<Vec<Notification>> {
        self.record("list")?;
        let held = lock(&self.held_fetches).pop_front();
        match held {
            Some(rx) => Ok(rx.await.unwrap_or_default()),
            None => Ok(self.server_notifications()),
        }
    }

    async fn mark_notification_read(&self, id: &NotificationId) -> FrontendResult<()> {
        self.record("mark_read")?;
        lock(&self.notifications)
            .iter_mut()
            .filter(|n| &n.id == id)
            .for_each(|n| n.is_read = true);
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> FrontendResult<()> {
        self.record("mark_all")?;
        lock(&self.notifications)
            .iter_mut()
            .for_each(|n| n.is_read = true);
        Ok(())
    }

    async fn delete_notification(&self, id: &NotificationId) -> FrontendResult<()> {
        self.record("delete")?;
        lock(&self.notifications).retain(|n| &n.id != id);
        Ok(())
    }
}

#[async_trait]
impl EventApi for MockApi {
    async fn list_events(&self) -> FrontendResult<Vec<Event>> {
        self.record("list_events")?;
        let held = lock(&self.held_event_fetches).pop_front();
        match held {
            Some(rx) => Ok(rx.await.unwrap_or_default()),
            None => Ok(lock(&self.events).clone()),
        }
    }

    async fn get_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.record("get_event")?;
        self.modify_event(id, |_| {})
    }

    async fn create_event(&self, form: &EventForm) -> FrontendResult<Event> {
        self.record("create_event")?;
        let mut events = lock(&self.events);
        let event = Event {
            id: EventId(format!("created-{}", events.len())),
            title: form.title.clone(),
            description: form.description.clone(),
            location: form.location.clone(),
            category: form.category.clone(),
            start_date: form.start_date,
            end_date: form.end_date,
            organizer: viewer(),
            participants: vec![viewer()],
            max_participants: form.max_participants,
            status: EventStatus::Upcoming,
            eco_points: form.eco_points,
            created_at: Utc::now(),
        };
        events.insert(0, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: &EventId, form: &EventForm) -> FrontendResult<Event> {
        self.record("update_event")?;
        self.modify_event(id, |e| {
            e.title = form.title.clone();
            e.description = form.description.clone();
            e.location = form.location.clone();
            e.start_date = form.start_date;
            e.end_date = form.end_date;
            e.max_participants = form.max_participants;
        })
    }

    async fn delete_event(&self, id: &EventId) -> FrontendResult<()> {
        self.record("delete_event")?;
        lock(&self.events).retain(|e| &e.id != id);
        Ok(())
    }

    async fn join_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.record("join_event")?;
        self.modify_event(id, |e| e.participants.push(viewer()))
    }

    async fn leave_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.record("leave_event")?;
        self.modify_event(id, |e| e.participants.retain(|p| p.id.0 != VIEWER))
    }

    async fn complete_event(&self, id: &EventId) -> FrontendResult<Event> {
        self.record("complete_event")?;
        self.modify_event(id, |e| e.status = EventStatus::Completed)
    }
}
