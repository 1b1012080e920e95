pub mod event;
pub mod newtypes;
pub mod notifications;
pub mod user;
pub mod validation;

pub use event::{Event, EventForm, EventStatus};
pub use notifications::{Notification, NotificationKind};
pub use user::UserRef;
