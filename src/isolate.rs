//! Error boundary for fallible operations.
//!
//! `isolate` runs an operation and hands back a plain `Result`: the value on
//! success, otherwise an [`IsolateError`]. Panics are caught as well, so a
//! caller can branch on the outcome of an external call without anything
//! unwinding past it.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsolateError {
    #[error(transparent)]
    Failed(#[from] anyhow::Error),

    #[error("operation panicked: {0}")]
    Panicked(String),
}

impl IsolateError {
    pub fn is_panic(&self) -> bool {
        matches!(self, IsolateError::Panicked(_))
    }
}

pub type Isolated<T> = std::result::Result<T, IsolateError>;

/// Awaits `operation`, converting its error or a panic into [`IsolateError`].
pub async fn isolate<T, E, F>(operation: F) -> Isolated<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<anyhow::Error>,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(IsolateError::Failed(err.into())),
        Err(payload) => Err(IsolateError::Panicked(panic_message(payload))),
    }
}

/// Synchronous counterpart of [`isolate`].
pub fn isolate_sync<T, E, F>(operation: F) -> Isolated<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: Into<anyhow::Error>,
{
    match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(IsolateError::Failed(err.into())),
        Err(payload) => Err(IsolateError::Panicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
