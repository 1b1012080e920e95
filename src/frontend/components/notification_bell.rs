use super::{notification_item::NotificationItem, NotificationContext};
use crate::frontend::{store::notifications::NotificationSnapshot, utils::formatting::badge_label};
use leptos::{ev, html::Div, prelude::*};
use leptos_use::{on_click_outside, use_interval_fn};
use phosphor_leptos::{Icon, BELL, BELL_RINGING, CHECK};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_BADGE_CEILING: usize = 9;

/// Whether the dropdown is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BellState {
    open: bool,
}

impl BellState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns true if this click closed the dropdown.
    pub fn on_outside_click(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// What the bell shows for a given store snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BellView {
    pub badge: Option<String>,
    pub show_mark_all: bool,
    pub empty: bool,
}

impl BellView {
    pub fn new(snapshot: &NotificationSnapshot, badge_ceiling: usize) -> Self {
        Self {
            badge: badge_label(snapshot.unread_count, badge_ceiling),
            show_mark_all: !snapshot.notifications.is_empty(),
            empty: snapshot.notifications.is_empty(),
        }
    }
}

/// Interval in milliseconds for the browser timer, saturating for very long durations.
fn interval_millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(not(target_family = "wasm"))]
pub use controller::BellController;

#[cfg(not(target_family = "wasm"))]
mod controller {
    use super::{BellState, BellView};
    use crate::{
        config::NotificationConfig,
        frontend::{
            store::NotificationStore,
            utils::{errors::FrontendResult, poll::PollHandle},
        },
    };
    use log::info;
    use std::{sync::Arc, time::Duration};

    /// Drives a notification bell without a browser: fetches on mount, polls while mounted and
    /// stops polling on unmount.
    pub struct BellController {
        store: Arc<NotificationStore>,
        interval: Duration,
        badge_ceiling: usize,
        state: BellState,
        poll: Option<PollHandle>,
    }

    impl BellController {
        pub fn new(store: Arc<NotificationStore>, config: &NotificationConfig) -> Self {
            Self {
                store,
                interval: config.poll_interval(),
                badge_ceiling: config.badge_ceiling,
                state: BellState::default(),
                poll: None,
            }
        }

        pub fn mount(&mut self) {
            if self.poll.is_some() {
                return;
            }
            info!("Polling notifications every {:?}", self.interval);
            let store = self.store.clone();
            self.poll = Some(PollHandle::start(self.interval, move || {
                let store = store.clone();
                async move {
                    // failures are logged by the store
                    _ = store.fetch_all().await;
                }
            }));
        }

        pub fn unmount(&mut self) {
            if let Some(mut poll) = self.poll.take() {
                poll.stop();
            }
            self.state.close();
        }

        pub fn is_mounted(&self) -> bool {
            self.poll.is_some()
        }

        pub fn toggle(&mut self) {
            self.state.toggle();
        }

        pub fn click_outside(&mut self) {
            self.state.on_outside_click();
        }

        pub fn is_open(&self) -> bool {
            self.state.is_open()
        }

        pub fn view(&self) -> BellView {
            BellView::new(&self.store.snapshot(), self.badge_ceiling)
        }

        pub async fn mark_all_as_read(&self) -> FrontendResult<()> {
            self.store.mark_all_as_read().await
        }
    }

    impl Drop for BellController {
        fn drop(&mut self) {
            self.unmount();
        }
    }
}

/// Bell icon with unread badge and a dropdown listing all notifications. Expects a
/// [NotificationContext].
#[component]
pub fn NotificationBell(
    #[prop(default = DEFAULT_POLL_INTERVAL)] poll_interval: Duration,
    #[prop(default = DEFAULT_BADGE_CEILING)] badge_ceiling: usize,
) -> impl IntoView {
    let ctx = expect_context::<NotificationContext>();
    let state = RwSignal::new(BellState::default());
    let dropdown = NodeRef::<Div>::new();
    let bell = Memo::new(move |_| ctx.snapshot.with(|s| BellView::new(s, badge_ceiling)));

    let fetch = move || ctx.dispatch(|store| async move { _ = store.fetch_all().await });
    Effect::new(move |_| fetch());
    // cleared automatically when the bell is unmounted
    let _polling = use_interval_fn(fetch, interval_millis(poll_interval));

    Effect::new(move |_| {
        if state.get().is_open() {
            let stop = on_click_outside(dropdown, move |_| {
                state.update(|s| {
                    s.on_outside_click();
                })
            });
            on_cleanup(stop);
        }
    });

    let mark_all = move |_: ev::MouseEvent| {
        ctx.dispatch(|store| async move { _ = store.mark_all_as_read().await })
    };

    view! {
        <div class="relative" node_ref=dropdown>
            <button
                class="btn btn-ghost btn-circle indicator"
                title="Notifications"
                on:click=move |_| state.update(|s| s.toggle())
            >
                {move || {
                    if bell.with(|b| b.badge.is_some()) {
                        view! { <Icon icon=BELL_RINGING size="24px" /> }
                    } else {
                        view! { <Icon icon=BELL size="24px" /> }
                    }
                }}
                {move || {
                    bell.with(|b| b.badge.clone())
                        .map(|badge| {
                            view! {
                                <span class="badge badge-sm badge-primary indicator-item">
                                    {badge}
                                </span>
                            }
                        })
                }}
            </button>
            <Show when=move || state.get().is_open()>
                <div class="absolute right-0 z-10 w-80 shadow card bg-base-100">
                    <div class="flex justify-between items-center p-2 border-b">
                        <h3 class="font-bold">"Notifications"</h3>
                        <Show when=move || bell.with(|b| b.show_mark_all)>
                            <button class="btn btn-xs btn-ghost" on:click=mark_all>
                                <Icon icon=CHECK />
                                "Mark all as read"
                            </button>
                        </Show>
                    </div>
                    <Show
                        when=move || !bell.with(|b| b.empty)
                        fallback=|| view! { <p class="p-4 text-center">"No notifications yet"</p> }
                    >
                        <ul class="overflow-y-auto max-h-96 divide-y">
                            <For
                                each=move || ctx.snapshot.with(|s| s.notifications.clone())
                                key=|n| (n.id.clone(), n.is_read)
                                children=move |notification| {
                                    view! { <NotificationItem notification=notification /> }
                                }
                            />
                        </ul>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
