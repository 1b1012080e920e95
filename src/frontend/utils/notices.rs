use leptos::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown to the user after an explicit action, eg a toast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Sink for user visible feedback. Background work such as polling never reports here.
pub trait Notices: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes notices to the log, used when there is no user interface.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotices;

impl Notices for LogNotices {
    fn success(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str) {
        warn!("{message}");
    }
}

impl Notices for RwSignal<Option<Notice>> {
    fn success(&self, message: &str) {
        _ = self.try_set(Some(Notice {
            kind: NoticeKind::Success,
            message: message.to_string(),
        }));
    }

    fn error(&self, message: &str) {
        _ = self.try_set(Some(Notice {
            kind: NoticeKind::Error,
            message: message.to_string(),
        }));
    }
}
