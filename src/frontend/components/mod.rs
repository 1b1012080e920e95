use crate::frontend::store::{notifications::NotificationSnapshot, NotificationStore};
use leptos::{prelude::*, task::spawn_local};
use std::{future::Future, sync::Arc};

pub mod notice_toast;
pub mod notification_bell;
pub mod notification_item;

/// Gives components access to the notification store. Components only read the snapshot and
/// dispatch store operations, they never change notifications themselves.
#[derive(Clone, Copy)]
pub struct NotificationContext {
    store: StoredValue<Arc<NotificationStore>>,
    pub snapshot: RwSignal<NotificationSnapshot>,
}

impl NotificationContext {
    pub fn provide(store: Arc<NotificationStore>) -> Self {
        let ctx = Self {
            snapshot: RwSignal::new(store.snapshot()),
            store: StoredValue::new(store),
        };
        provide_context(ctx);
        ctx
    }

    /// Copies the current store contents into the snapshot signal. Does nothing once the
    /// component which provided the context is gone.
    pub fn refresh(&self) {
        if let Some(store) = self.store.try_get_value() {
            _ = self.snapshot.try_set(store.snapshot());
        }
    }

    /// Runs a store operation in the background and re-renders once it is done.
    pub fn dispatch<F, Fut>(&self, action: F)
    where
        F: FnOnce(Arc<NotificationStore>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let Some(store) = self.store.try_get_value() else {
            return;
        };
        let ctx = *self;
        spawn_local(async move {
            action(store).await;
            ctx.refresh();
        });
    }
}
