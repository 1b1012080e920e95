use super::FetchOutcome;
use crate::{
    common::{newtypes::NotificationId, Notification},
    frontend::{
        api::NotificationApi,
        utils::{
            errors::{FrontendResult, FrontendResultExt},
            notices::Notices,
            sequence::{RequestSequence, Ticket},
        },
    },
};
use log::{debug, info, warn};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

/// Copy of the store contents for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct NotificationState {
    notifications: Vec<Notification>,
    unread_count: usize,
    fetches_in_flight: usize,
    sequence: RequestSequence,
    /// Marked as read locally. Holds the last issued fetch ticket once the backend confirmed
    /// it, `None` while the confirmation is outstanding.
    local_reads: HashMap<NotificationId, Option<Ticket>>,
    /// Confirmation failed, sent again after the next successful fetch
    pending_reads: HashSet<NotificationId>,
    consecutive_failures: u32,
}

impl NotificationState {
    fn recount(&mut self) {
        self.unread_count = self.notifications.iter().filter(|n| !n.is_read).count();
    }

    /// A list fetched with `ticket` may have been built before the backend saw the local read.
    fn keeps_read(&self, id: &NotificationId, ticket: Ticket) -> bool {
        match self.local_reads.get(id) {
            Some(None) => true,
            Some(Some(confirmed)) => ticket <= *confirmed,
            None => false,
        }
    }

    /// Replaces the list with the one fetched with `ticket` and returns the ids whose read
    /// confirmation needs to be sent again.
    fn replace(&mut self, fetched: Vec<Notification>, ticket: Ticket) -> Vec<NotificationId> {
        let mut seen = HashSet::with_capacity(fetched.len());
        let mut retry = vec![];
        let mut notifications = Vec::with_capacity(fetched.len());
        for mut notification in fetched {
            if !seen.insert(notification.id.clone()) {
                continue;
            }
            if notification.is_read {
                self.local_reads.remove(&notification.id);
            } else if self.keeps_read(&notification.id, ticket) {
                notification.is_read = true;
                if self.pending_reads.contains(&notification.id) {
                    retry.push(notification.id.clone());
                }
            }
            notifications.push(notification);
        }
        self.pending_reads.clear();
        self.local_reads
            .retain(|id, confirmed| seen.contains(id) && confirmed.is_none_or(|c| ticket <= c));
        self.notifications = notifications;
        self.recount();
        retry
    }

    fn mark_read(&mut self, id: &NotificationId) -> bool {
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && !n.is_read)
        else {
            return false;
        };
        notification.is_read = true;
        self.local_reads.insert(id.clone(), None);
        self.recount();
        true
    }

    fn confirm(&mut self, ids: &[NotificationId]) {
        let latest = self.sequence.last_issued();
        for id in ids {
            if let Some(confirmed) = self.local_reads.get_mut(id) {
                *confirmed = Some(latest);
            }
        }
    }

    /// Marks everything as read and returns the ids which were unread before.
    fn mark_all_read(&mut self) -> Vec<NotificationId> {
        let previously_unread = self
            .notifications
            .iter_mut()
            .filter(|n| !n.is_read)
            .map(|n| {
                n.is_read = true;
                n.id.clone()
            })
            .collect::<Vec<_>>();
        for id in &previously_unread {
            self.local_reads.insert(id.clone(), None);
        }
        self.recount();
        previously_unread
    }

    fn mark_unread(&mut self, ids: &[NotificationId]) {
        self.notifications
            .iter_mut()
            .filter(|n| ids.contains(&n.id) && !self.pending_reads.contains(&n.id))
            .for_each(|n| n.is_read = false);
        for id in ids {
            if !self.pending_reads.contains(id) {
                self.local_reads.remove(id);
            }
        }
        self.recount();
    }

    fn remove(&mut self, id: &NotificationId) -> Option<Notification> {
        let index = self.notifications.iter().position(|n| &n.id == id)?;
        let removed = self.notifications.remove(index);
        self.pending_reads.remove(id);
        self.local_reads.remove(id);
        self.recount();
        Some(removed)
    }

    fn insert(&mut self, notification: Notification) -> bool {
        if self.notifications.iter().any(|n| n.id == notification.id) {
            return false;
        }
        self.notifications.insert(0, notification);
        self.recount();
        true
    }
}

/// Owns the notification list of the logged in user and keeps it in sync with the backend.
///
/// The unread count is recomputed from the list after every change. All operations take
/// `&self`, the store is meant to be shared behind an [Arc] between the bell, its items and the
/// poll task.
pub struct NotificationStore {
    api: Arc<dyn NotificationApi>,
    notices: Arc<dyn Notices>,
    state: Mutex<NotificationState>,
    closed: AtomicBool,
}

/// Keeps the loading flag set while a fetch is running, also when the fetch gets cancelled.
struct Loading<'a>(&'a NotificationStore);

impl<'a> Loading<'a> {
    fn start(store: &'a NotificationStore) -> Self {
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

impl NotificationStore {
    pub fn new(api: Arc<dyn NotificationApi>, notices: Arc<dyn Notices>) -> Self {
        Self {
            api,
            notices,
            state: Mutex::new(NotificationState::default()),
            closed: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, NotificationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> NotificationSnapshot {
        let state = self.state();
        NotificationSnapshot {
            notifications: state.notifications.clone(),
            unread_count: state.unread_count,
            loading: state.fetches_in_flight > 0,
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state().unread_count
    }

    pub fn is_loading(&self) -> bool {
        self.state().fetches_in_flight > 0
    }

    /// After closing, responses which are still in flight are ignored.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Loads the complete list from the backend and replaces the local one.
    ///
    /// This runs in the background on every poll, so failures are only logged and the
    /// previous list stays visible.
    pub async fn fetch_all(&self) -> FrontendResult<FetchOutcome> {
        let loading = Loading::start(self);
        let ticket = self.state().sequence.issue();
        debug!("Fetching notifications");
        let res = self.api.list_notifications().await;
        drop(loading);

        let retry = {
            let mut state = self.state();
            if self.is_closed() {
                return Ok(FetchOutcome::Discarded);
            }
            let fetched = match res {
                Ok(fetched) => fetched,
                Err(e) => {
                    state.consecutive_failures += 1;
                    if state.consecutive_failures == 1 {
                        warn!("Failed to fetch notifications: {e}");
                    } else {
                        debug!(
                            "Failed to fetch notifications ({} times in a row): {e}",
                            state.consecutive_failures
                        );
                    }
                    return Err(e);
                }
            };
            if !state.sequence.accept(ticket) {
                debug!("Discarding outdated notification list");
                return Ok(FetchOutcome::Discarded);
            }
            if state.consecutive_failures > 0 {
                info!(
                    "Fetching notifications works again after {} failures",
                    state.consecutive_failures
                );
                state.consecutive_failures = 0;
            }
            state.replace(fetched, ticket)
        };

        for id in retry {
            self.confirm_read(&id).await;
        }
        Ok(FetchOutcome::Applied)
    }

    /// Marks a single notification as read. Returns false without contacting the backend if it
    /// is unknown or already read.
    ///
    /// The local change is kept when the backend call fails, the confirmation is sent again
    /// after the next successful fetch.
    pub async fn mark_as_read(&self, id: &NotificationId) -> bool {
        let changed = self.state().mark_read(id);
        if changed {
            self.confirm_read(id).await;
        }
        changed
    }

    async fn confirm_read(&self, id: &NotificationId) {
        match self.api.mark_notification_read(id).await {
            Ok(()) => self.state().confirm(std::slice::from_ref(id)),
            Err(e) => {
                warn!("Failed to mark notification {id} as read, retrying after next fetch: {e}");
                self.state().pending_reads.insert(id.clone());
            }
        }
    }

    /// Marks every notification as read. If the backend rejects it the previously unread
    /// notifications become unread again.
    pub async fn mark_all_as_read(&self) -> FrontendResult<()> {
        let previously_unread = self.state().mark_all_read();
        let res = self
            .api
            .mark_all_notifications_read()
            .await
            .notify_err(self.notices.as_ref());
        match res {
            Ok(()) => {
                info!("Marked {} notifications as read", previously_unread.len());
                let mut state = self.state();
                let outstanding: Vec<_> = state.local_reads.keys().cloned().collect();
                state.confirm(&outstanding);
                state.pending_reads.clear();
                drop(state);
                self.notices.success("All notifications marked as read");
                Ok(())
            }
            Err(e) => {
                if !self.is_closed() {
                    self.state().mark_unread(&previously_unread);
                }
                Err(e)
            }
        }
    }

    /// Deletes a notification locally and on the backend. A failure is shown to the user, but
    /// the notification is not restored.
    pub async fn remove(&self, id: &NotificationId) -> FrontendResult<()> {
        let removed = self.state().remove(id);
        if removed.is_none() {
            debug!("Removing notification {id} which is not in the local list");
        }
        self.api
            .delete_notification(id)
            .await
            .notify_err(self.notices.as_ref())
    }

    /// Inserts a notification which arrived outside of a fetch at the top of the list. Returns
    /// false if a notification with the same id is already present.
    pub fn add(&self, notification: Notification) -> bool {
        self.state().insert(notification)
    }
}
