use crate::common::user::UserRef;
use chrono::{DateTime, Local, Utc};
use std::sync::OnceLock;
use timeago::Formatter;

pub fn user_title(user: &UserRef) -> String {
    format!("@{}", user.name)
}

pub fn user_path(user: &UserRef) -> String {
    format!("/profile/{}", user.id)
}

pub fn render_date_time(date_time: DateTime<Utc>) -> String {
    date_time
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn time_ago(time: DateTime<Utc>) -> String {
    relative_time(time, Utc::now())
}

/// Human readable distance between `time` and `now`, eg "5 minutes ago". Timestamps in the
/// future are treated as "now".
pub fn relative_time(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    static INSTANCE: OnceLock<Formatter> = OnceLock::new();
    let secs = now.signed_duration_since(time).num_seconds();
    let duration = std::time::Duration::from_secs(secs.try_into().unwrap_or_default());
    INSTANCE.get_or_init(Formatter::new).convert(duration)
}

/// Text for the unread badge, `None` when it should be hidden. Counts above `ceiling` are
/// shown as "{ceiling}+".
pub fn badge_label(unread: usize, ceiling: usize) -> Option<String> {
    match unread {
        0 => None,
        n if n > ceiling => Some(format!("{ceiling}+")),
        n => Some(n.to_string()),
    }
}
