use crate::{
    common::{event::EventRuleViolation, validation::FormError},
    frontend::utils::notices::Notices,
};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type FrontendResult<T> = Result<T, FrontendError>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    /// The request was sent but no response arrived (connection refused, timeout, ...)
    #[error("No response from server: {0}")]
    NoResponse(String),
    /// The server answered with an error status, or with a body that could not be decoded
    #[error("{message}")]
    ErrorResponse { status: u16, message: String },
    /// The request could not be built
    #[error("Failed to prepare request: {0}")]
    RequestSetup(String),
    /// Rejected locally before any request was made
    #[error("{0}")]
    Validation(String),
}

impl FrontendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FrontendError::ErrorResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub trait FrontendResultExt<T> {
    /// Shows the error to the user once and passes the result on.
    fn notify_err(self, notices: &dyn Notices) -> FrontendResult<T>;
}

impl<T> FrontendResultExt<T> for FrontendResult<T> {
    fn notify_err(self, notices: &dyn Notices) -> FrontendResult<T> {
        if let Err(e) = &self {
            warn!("{e}");
            notices.error(&e.to_string());
        }
        self
    }
}

impl From<reqwest::Error> for FrontendError {
    fn from(value: reqwest::Error) -> Self {
        if let Some(status) = value.status() {
            FrontendError::ErrorResponse {
                status: status.as_u16(),
                message: value.to_string(),
            }
        } else if value.is_builder() {
            FrontendError::RequestSetup(value.to_string())
        } else {
            FrontendError::NoResponse(value.to_string())
        }
    }
}

impl From<url::ParseError> for FrontendError {
    fn from(value: url::ParseError) -> Self {
        Self::RequestSetup(value.to_string())
    }
}

impl From<FormError> for FrontendError {
    fn from(value: FormError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<EventRuleViolation> for FrontendError {
    fn from(value: EventRuleViolation) -> Self {
        Self::Validation(value.to_string())
    }
}
