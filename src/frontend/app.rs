use crate::{
    config::EcohubConfig,
    frontend::{
        api::ApiClient,
        components::{
            notice_toast::{provide_notices, NoticeToast},
            notification_bell::NotificationBell,
            NotificationContext,
        },
        store::NotificationStore,
    },
};
use leptos::{either::Either, prelude::*};
use log::error;
use std::sync::Arc;

/// Page header with the notification bell. Everything below the header is rendered by the
/// surrounding application.
#[component]
pub fn App(#[prop(optional)] config: EcohubConfig) -> impl IntoView {
    let notices = provide_notices();
    let api = match ApiClient::new(&config.api) {
        Ok(api) => api,
        Err(e) => {
            error!("Invalid api configuration: {e}");
            return Either::Right(view! {
                <p class="alert alert-error">"Cannot connect to the server"</p>
            });
        }
    };
    let store = Arc::new(NotificationStore::new(Arc::new(api), Arc::new(notices)));
    NotificationContext::provide(store.clone());
    // ignore responses which arrive after the page is gone
    on_cleanup(move || store.close());

    let poll_interval = config.notifications.poll_interval();
    let badge_ceiling = config.notifications.badge_ceiling;
    Either::Left(view! {
        <header class="shadow-sm navbar bg-base-100">
            <a class="text-xl btn btn-ghost" href="/">
                "EcoHub"
            </a>
            <div class="flex-1"></div>
            <NotificationBell poll_interval=poll_interval badge_ceiling=badge_ceiling />
        </header>
        <NoticeToast />
    })
}
