use async_trait::async_trait;

use crate::domain::review::ReviewInfo;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait ReviewTracker: Send + Sync {
    /// Files the review request and returns the ticket as stored by the tracker.
    async fn create_review(&self, info: &ReviewInfo) -> AppResult<Ticket>;
    async fn add_comment(&self, ticket: &Ticket, body: &str) -> AppResult<()>;
}
