use super::FetchOutcome;
use crate::{
    common::{
        event::EventRuleViolation,
        newtypes::{EventId, UserId},
        validation::validate_event_form,
        Event,
        EventForm,
    },
    frontend::{
        api::EventApi,
        utils::{
            errors::{FrontendError, FrontendResult, FrontendResultExt},
            notices::Notices,
            sequence::RequestSequence,
        },
    },
};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSnapshot {
    pub events: Vec<Event>,
    pub current: Option<Event>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct EventState {
    events: Vec<Event>,
    /// Event shown on the detail page
    current: Option<Event>,
    fetches_in_flight: usize,
    sequence: RequestSequence,
}

impl EventState {
    /// Writes a fresh copy of an event into every place which shows it.
    fn sync(&mut self, event: &Event) {
        if let Some(existing) = self.events.iter_mut().find(|e| e.id == event.id) {
            *existing = event.clone();
        }
        if self.current.as_ref().is_some_and(|c| c.id == event.id) {
            self.current = Some(event.clone());
        }
    }

    fn find(&self, id: &EventId) -> Option<Event> {
        self.current
            .as_ref()
            .filter(|c| &c.id == id)
            .or_else(|| self.events.iter().find(|e| &e.id == id))
            .cloned()
    }
}

/// Community events as seen by one user, with the participation rules checked locally before
/// anything is sent to the backend.
pub struct EventStore {
    api: Arc<dyn EventApi>,
    notices: Arc<dyn Notices>,
    viewer: UserId,
    state: Mutex<EventState>,
    closed: AtomicBool,
}

/// Keeps the loading flag set while a fetch is running, also when the fetch gets cancelled.
struct Loading<'a>(&'a EventStore);

impl<'a> Loading<'a> {
    fn start(store: &'a EventStore) -> Self {
        store.state().fetches_in_flight += 1;
        Self(store)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let mut state = self.0.state();
        state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
    }
}

impl EventStore {
    pub fn new(api: Arc<dyn EventApi>, notices: Arc<dyn Notices>, viewer: UserId) -> Self {
        Self {
            api,
            notices,
            viewer,
            state: Mutex::new(EventState::default()),
            closed: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, EventState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> EventSnapshot {
        let state = self.state();
        EventSnapshot {
            events: state.events.clone(),
            current: state.current.clone(),
            loading: state.fetches_in_flight > 0,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn current(&self) -> Option<Event> {
        self.state().current.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().fetches_in_flight > 0
    }

    pub fn joined_events(&self) -> Vec<Event> {
        self.state()
            .events
            .iter()
            .filter(|e| e.is_participant(&self.viewer) && !e.is_organizer(&self.viewer))
            .cloned()
            .collect()
    }

    pub fn organized_events(&self) -> Vec<Event> {
        self.state()
            .events
            .iter()
            .filter(|e| e.is_organizer(&self.viewer))
            .cloned()
            .collect()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Replaces the event list. Like the notification fetch this may run in the background, so
    /// errors are only logged and outdated responses are dropped.
    pub async fn fetch_all(&self) -> FrontendResult<FetchOutcome> {
        let loading = Loading::start(self);
        let ticket = self.state().sequence.issue();
        debug!("Fetching events");
        let res = self.api.list_events().await;
        drop(loading);

        let mut state = self.state();
        if self.closed.load(Ordering::SeqCst) {
            return Ok(FetchOutcome::Discarded);
        }
        let events = res.inspect_err(|e| warn!("Failed to fetch events: {e}"))?;
        if !state.sequence.accept(ticket) {
            debug!("Discarding outdated event list");
            return Ok(FetchOutcome::Discarded);
        }
        if let Some(current) = state
            .current
            .as_ref()
            .and_then(|c| events.iter().find(|e| e.id == c.id))
        {
            state.current = Some(current.clone());
        }
        state.events = events;
        Ok(FetchOutcome::Applied)
    }

    /// Loads a single event for the detail page.
    pub async fn fetch_one(&self, id: &EventId) -> FrontendResult<Event> {
        let event = self
            .api
            .get_event(id)
            .await
            .notify_err(self.notices.as_ref())?;
        let mut state = self.state();
        state.current = Some(event.clone());
        state.sync(&event);
        Ok(event)
    }

    pub async fn create(&self, form: &EventForm) -> FrontendResult<Event> {
        validate_event_form(form, Utc::now(), true)
            .map_err(FrontendError::from)
            .notify_err(self.notices.as_ref())?;
        let event = self
            .api
            .create_event(form)
            .await
            .notify_err(self.notices.as_ref())?;
        info!("Created event {}", event.id);
        self.state().events.insert(0, event.clone());
        self.notices.success("Event created");
        Ok(event)
    }

    pub async fn update(&self, id: &EventId, form: &EventForm) -> FrontendResult<Event> {
        validate_event_form(form, Utc::now(), false)
            .map_err(FrontendError::from)
            .notify_err(self.notices.as_ref())?;
        let event = self
            .api
            .update_event(id, form)
            .await
            .notify_err(self.notices.as_ref())?;
        self.state().sync(&event);
        self.notices.success("Event updated");
        Ok(event)
    }

    /// Deletes an event. Unlike notifications the local copy is only removed once the backend
    /// confirmed it.
    pub async fn delete(&self, id: &EventId) -> FrontendResult<()> {
        self.api
            .delete_event(id)
            .await
            .notify_err(self.notices.as_ref())?;
        info!("Deleted event {id}");
        let mut state = self.state();
        state.events.retain(|e| &e.id != id);
        if state.current.as_ref().is_some_and(|c| &c.id == id) {
            state.current = None;
        }
        drop(state);
        self.notices.success("Event deleted");
        Ok(())
    }

    pub async fn join(&self, id: &EventId) -> FrontendResult<Event> {
        let event = self.known_event(id)?;
        self.check(event.can_join(&self.viewer, Utc::now()))?;
        let event = self
            .api
            .join_event(id)
            .await
            .notify_err(self.notices.as_ref())?;
        self.state().sync(&event);
        self.notices.success(&format!("You joined {}", event.title));
        Ok(event)
    }

    pub async fn leave(&self, id: &EventId) -> FrontendResult<Event> {
        let event = self.known_event(id)?;
        self.check(event.can_leave(&self.viewer, Utc::now()))?;
        let event = self
            .api
            .leave_event(id)
            .await
            .notify_err(self.notices.as_ref())?;
        self.state().sync(&event);
        self.notices.success(&format!("You left {}", event.title));
        Ok(event)
    }

    /// Completes an event as its organizer. This can not be undone, the backend awards the
    /// event's points to all participants.
    pub async fn complete(&self, id: &EventId) -> FrontendResult<Event> {
        let event = self.known_event(id)?;
        self.check(event.can_complete(&self.viewer))?;
        let event = self
            .api
            .complete_event(id)
            .await
            .notify_err(self.notices.as_ref())?;
        info!("Completed event {id}");
        self.state().sync(&event);
        self.notices
            .success("Event completed, points were awarded to participants");
        Ok(event)
    }

    fn known_event(&self, id: &EventId) -> FrontendResult<Event> {
        let event = self.state().find(id);
        event
            .ok_or_else(|| FrontendError::validation("Event not found"))
            .notify_err(self.notices.as_ref())
    }

    fn check(&self, rule: Result<(), EventRuleViolation>) -> FrontendResult<()> {
        rule.map_err(FrontendError::from)
            .notify_err(self.notices.as_ref())
    }
}
