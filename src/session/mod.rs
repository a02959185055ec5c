pub mod chrome;
#[cfg(test)]
pub mod fake;

pub use chrome::ChromeSessionFactory;

use std::future::Future;

use crate::error::{AppError, Result};

/// One remote page, owned by a single worker for the duration of one record.
pub trait PageSession: Send {
    /// Load `url` and wait for the page to settle.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Trimmed text of the first element matching `selector`.
    /// A missing element is [`AppError::ElementNotFound`].
    fn read_text(&mut self, selector: &str) -> impl Future<Output = Result<String>> + Send;

    /// Click the first element matching `selector`. Fire-and-forget: the resulting
    /// page state is never confirmed.
    fn click(&mut self, selector: &str) -> impl Future<Output = Result<()>> + Send;

    /// Tear the session down. Never fails the record.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}

/// Hands out a fresh [`PageSession`] per record.
pub trait SessionFactory: Send + Sync + 'static {
    type Session: PageSession;

    fn open(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Whether `selector` matches anything. Only a selector miss reads as `false`;
/// session failures still propagate.
pub async fn is_present<S: PageSession>(session: &mut S, selector: &str) -> Result<bool> {
    match session.read_text(selector).await {
        Ok(_) => Ok(true),
        Err(AppError::ElementNotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
