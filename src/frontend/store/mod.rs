//! State containers shared by the components. Each store owns its list, talks to the backend
//! through an api trait and is handed to the components explicitly.

pub mod events;
pub mod notifications;

pub use events::EventStore;
pub use notifications::NotificationStore;

/// What happened to the response of a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer response was already applied, or the store was closed
    Discarded,
}
