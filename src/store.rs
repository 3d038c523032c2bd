use tracing::{info, warn};

use crate::error::StoreError;
use crate::model::ticket::{Label, Ticket};
use crate::reconcile::{self, Reconciliation};
use crate::tracker::IssueTracker;

/// Owns the ticket table shown to the user and the shadow copy of what the
/// tracker is known to hold. Every mutation goes through `&mut self`, so one
/// operation is in flight at a time.
pub struct TicketStore {
    tracker: Box<dyn IssueTracker>,
    table: Vec<Ticket>,
    shadow: Vec<Ticket>,
    loaded: bool,
}

impl TicketStore {
    pub fn new(tracker: Box<dyn IssueTracker>) -> Self {
        Self {
            tracker,
            table: Vec::new(),
            shadow: Vec::new(),
            loaded: false,
        }
    }

    pub fn tracker_name(&self) -> &str {
        self.tracker.name()
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.table
    }

    #[cfg(test)]
    pub fn shadow(&self) -> &[Ticket] {
        &self.shadow
    }

    /// Loads the table on first use. Later calls return what is already held.
    pub async fn initialize(&mut self) -> &[Ticket] {
        if !self.loaded {
            self.load().await;
        }
        &self.table
    }

    /// Drops any unreconciled edits and reloads from the tracker.
    pub async fn refresh(&mut self) -> &[Ticket] {
        self.load().await;
        &self.table
    }

    async fn load(&mut self) {
        let tickets = match self.tracker.list_issues().await {
            Ok(tickets) => tickets,
            Err(e) => {
                warn!(tracker = self.tracker.name(), error = %e, "fetch failed, showing empty table");
                Vec::new()
            }
        };
        info!(count = tickets.len(), "ticket table loaded");
        self.shadow = tickets.clone();
        self.table = tickets;
        self.loaded = true;
    }

    /// Creates the ticket remotely and puts it at the top of the table.
    ///
    /// The new row is also added to the shadow: it was just read back from
    /// the tracker, so it is in sync.
    pub async fn submit_new_ticket(&mut self, title: &str, label: Label) -> Result<Ticket, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let ticket = self
            .tracker
            .create_issue(title, &label)
            .await
            .map_err(|e| {
                warn!(error = %e, "create failed");
                StoreError::CreateFailed(e)
            })?;

        info!(id = %ticket.id, "ticket created");
        self.table.insert(0, ticket.clone());
        self.shadow.insert(0, ticket.clone());
        Ok(ticket)
    }

    /// Pushes the differences between `edited` and the shadow to the tracker
    /// and installs the resulting table.
    pub async fn apply_edits(&mut self, edited: &[Ticket]) -> Reconciliation {
        let result = reconcile::reconcile(self.tracker.as_ref(), &self.shadow, edited).await;
        self.shadow = result.table.clone();
        self.table = result.table.clone();
        result
    }
}
