use super::NotificationContext;
use crate::{
    common::{newtypes::NotificationId, Notification, NotificationKind},
    frontend::{
        store::NotificationStore,
        utils::{
            errors::FrontendResult,
            formatting::{render_date_time, time_ago, user_path, user_title},
        },
    },
};
use leptos::{ev, prelude::*};
use log::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Reward,
    Warning,
    Critical,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Tone::Normal => "",
            Tone::Reward => "border-l-4 border-success",
            Tone::Warning => "border-l-4 border-warning",
            Tone::Critical => "border-l-4 border-error",
        }
    }
}

/// Everything needed to render one notification, derived from its kind and payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationView {
    pub icon: &'static str,
    pub title: String,
    pub body: Option<String>,
    /// Page to open on click, `None` for system notifications
    pub target: Option<String>,
    pub tone: Tone,
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        use NotificationKind::*;
        let sender = notification
            .sender
            .as_ref()
            .map(user_title)
            .unwrap_or_else(|| "Someone".to_string());
        let profile = notification.sender.as_ref().map(user_path);
        let body = notification.kind.message().map(str::to_string);
        let (icon, title, target, tone) = match &notification.kind {
            Follow => (
                "👤",
                format!("{sender} started following you"),
                profile,
                Tone::Normal,
            ),
            Like { post } => (
                "❤️",
                format!("{sender} liked your post"),
                post.as_ref().map(|p| format!("/posts/{}", p.id)).or(profile),
                Tone::Normal,
            ),
            Comment { post, .. } => (
                "💬",
                format!("{sender} commented on your post"),
                post.as_ref().map(|p| format!("/posts/{}", p.id)).or(profile),
                Tone::Normal,
            ),
            EventInvite { event } => (
                "📅",
                match event {
                    Some(e) if !e.title.is_empty() => {
                        format!("{sender} invited you to {}", e.title)
                    }
                    _ => format!("{sender} invited you to an event"),
                },
                event.as_ref().map(|e| format!("/events/{}", e.id)),
                Tone::Normal,
            ),
            MarketplaceOffer { item, .. } => (
                "🛒",
                match item {
                    Some(i) if !i.title.is_empty() => {
                        format!("{sender} made an offer on {}", i.title)
                    }
                    _ => format!("{sender} made an offer on your item"),
                },
                item.as_ref().map(|i| format!("/marketplace/{}", i.id)),
                Tone::Normal,
            ),
            EcoPoints { .. } => ("🌱", "You earned eco points".to_string(), None, Tone::Reward),
            BadgePurchase { .. } => ("🏅", "Badge purchased".to_string(), None, Tone::Reward),
            AdminAlert { .. } => (
                "📢",
                "Message from the moderators".to_string(),
                None,
                Tone::Warning,
            ),
            Warning { .. } => ("⚠️", "Warning".to_string(), None, Tone::Warning),
            Info { .. } => ("ℹ️", "Information".to_string(), None, Tone::Normal),
            Critical { .. } => ("🚨", "Critical alert".to_string(), None, Tone::Critical),
            Other { .. } => (
                "🔔",
                "Untyped notification".to_string(),
                None,
                Tone::Normal,
            ),
        };
        NotificationView {
            icon,
            title,
            body,
            target,
            tone,
        }
    }
}

/// Handles a click on the notification content: marks it as read if needed and returns the
/// page to navigate to.
pub async fn open_notification(
    store: &NotificationStore,
    notification: &Notification,
) -> Option<String> {
    if !notification.is_read {
        store.mark_as_read(&notification.id).await;
    }
    NotificationView::from(notification).target
}

/// Handles the remove button. Never marks as read or navigates.
pub async fn remove_notification(
    store: &NotificationStore,
    id: &NotificationId,
) -> FrontendResult<()> {
    store.remove(id).await
}

fn navigate(target: &str) {
    if let Err(e) = window().location().set_href(target) {
        warn!("Failed to open {target}: {e:?}");
    }
}

#[component]
pub fn NotificationItem(notification: Notification) -> impl IntoView {
    let ctx = expect_context::<NotificationContext>();
    let display = NotificationView::from(&notification);
    let is_read = notification.is_read;
    let created_at = notification.created_at;
    let kind = notification.kind.as_str().to_string();
    let notification = StoredValue::new(notification);

    // navigate only after the read state reached the backend, the href is kept for
    // middle clicks and clients without javascript
    let on_open = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        ctx.dispatch(move |store| async move {
            if let Some(target) = open_notification(&store, &notification.get_value()).await {
                navigate(&target);
            }
        });
    };
    let on_remove = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        ev.prevent_default();
        ctx.dispatch(move |store| async move {
            let id = notification.with_value(|n| n.id.clone());
            _ = remove_notification(&store, &id).await;
        });
    };

    let class = format!(
        "group flex items-start gap-2 p-2 {} {}",
        display.tone.class(),
        if is_read { "opacity-60" } else { "font-semibold" },
    );
    view! {
        <li class=class data-kind=kind>
            <a class="flex flex-1 gap-2" href=display.target on:click=on_open>
                <span class="text-xl">{display.icon}</span>
                <div class="flex-1">
                    <p>{display.title}</p>
                    {display.body.map(|body| view! { <p class="text-sm opacity-80">{body}</p> })}
                    <p class="text-xs opacity-60" title=render_date_time(created_at)>
                        {time_ago(created_at)}
                    </p>
                </div>
                {(!is_read)
                    .then(|| {
                        view! {
                            <span
                                class="mt-2 w-2 h-2 rounded-full bg-primary"
                                title="Unread"
                            ></span>
                        }
                    })}
            </a>
            <button
                class="opacity-0 btn btn-xs btn-ghost group-hover:opacity-100 focus:opacity-100"
                title="Remove"
                on:click=on_remove
            >
                "×"
            </button>
        </li>
    }
}
