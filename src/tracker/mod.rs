pub mod github;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::TrackerError;
use crate::model::ticket::{Label, Ticket, TicketId, TicketPatch};

/// Remote issue tracker backing the ticket table. Implementations translate
/// between the tracker's schema and [`Ticket`]; they never hold local state.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    fn name(&self) -> &str;
    async fn list_issues(&self) -> Result<Vec<Ticket>, TrackerError>;
    /// Create an issue titled `title` (also used as its body) carrying `label`.
    async fn create_issue(&self, title: &str, label: &Label) -> Result<Ticket, TrackerError>;
    /// Push only the fields present in `patch`.
    async fn update_issue(&self, id: TicketId, patch: &TicketPatch) -> Result<(), TrackerError>;
}

#[cfg(test)]
pub mod mock;

pub fn create_tracker(config: &AppConfig) -> anyhow::Result<Box<dyn IssueTracker>> {
    let tracker = github::GitHubTracker::new(&config.github)?;
    Ok(Box::new(tracker))
}
