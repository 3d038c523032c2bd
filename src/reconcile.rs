use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::model::ticket::{Ticket, TicketId, TicketPatch};
use crate::tracker::IssueTracker;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every changed row was accepted by the tracker.
    Committed,
    NoChanges,
    /// Edited table and shadow differ in length. Nothing was sent.
    RowCountMismatch { edited: usize, shadow: usize },
    /// Edited table holds a ticket the shadow has never seen. Nothing was sent.
    UnknownTicket(TicketId),
    /// Edited table holds the same ticket twice. Nothing was sent.
    DuplicateTicket(TicketId),
    /// The tracker rejected the update for `id`; later rows were not sent.
    UpdateFailed { id: TicketId, reason: String },
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Table to show and to keep as the new shadow.
    pub table: Vec<Ticket>,
    /// Tickets whose update the tracker accepted, in the order they were sent.
    pub applied: Vec<TicketId>,
    pub outcome: Outcome,
}

impl Reconciliation {
    fn unchanged(shadow: &[Ticket], outcome: Outcome) -> Self {
        Self {
            table: shadow.to_vec(),
            applied: Vec::new(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Committed | Outcome::NoChanges)
    }

    /// One-line message for the user.
    pub fn summary(&self) -> String {
        match &self.outcome {
            Outcome::Committed => match self.applied.as_slice() {
                [id] => format!("{id} updated"),
                ids => format!("{} tickets updated", ids.len()),
            },
            Outcome::NoChanges => "No changes".into(),
            Outcome::RowCountMismatch { edited, shadow } => {
                format!("Row count changed ({shadow} -> {edited}), edits not synced")
            }
            Outcome::UnknownTicket(id) => format!("{id} is not a known ticket, edits not synced"),
            Outcome::DuplicateTicket(id) => format!("{id} appears more than once, edits not synced"),
            Outcome::UpdateFailed { id, reason } => format!("Failed to update {id}: {reason}"),
        }
    }
}

/// Fields of `edited` that differ from `previous`. Id and date are ignored.
pub fn diff_row(previous: &Ticket, edited: &Ticket) -> TicketPatch {
    TicketPatch {
        status: (edited.status != previous.status).then_some(edited.status),
        title: (edited.title != previous.title).then(|| edited.title.clone()),
        label: (edited.label != previous.label).then(|| edited.label.clone()),
    }
}

/// Pairs every row of `edited` with its shadow row by id and returns the
/// patches to send, in shadow order.
pub fn diff(shadow: &[Ticket], edited: &[Ticket]) -> Result<Vec<(TicketId, TicketPatch)>, Outcome> {
    if edited.len() != shadow.len() {
        return Err(Outcome::RowCountMismatch {
            edited: edited.len(),
            shadow: shadow.len(),
        });
    }

    let mut seen = HashSet::with_capacity(edited.len());
    if let Some(dup) = edited.iter().find(|t| !seen.insert(t.id)) {
        return Err(Outcome::DuplicateTicket(dup.id));
    }

    let by_id: HashMap<TicketId, &Ticket> = edited.iter().map(|t| (t.id, t)).collect();
    if let Some(stray) = edited
        .iter()
        .find(|t| !shadow.iter().any(|s| s.id == t.id))
    {
        return Err(Outcome::UnknownTicket(stray.id));
    }

    let patches = shadow
        .iter()
        .filter_map(|previous| {
            let edited = by_id.get(&previous.id)?;
            let patch = diff_row(previous, edited);
            (!patch.is_empty()).then_some((previous.id, patch))
        })
        .collect();
    Ok(patches)
}

/// Replays the edits in `edited` against the tracker.
///
/// Rows are committed one at a time: when an update fails, the returned
/// table is the shadow plus every row the tracker already accepted, so the
/// local view never claims less than what the remote holds. On success the
/// table follows the row order of `edited`, with id and submission date
/// taken from the shadow.
pub async fn reconcile(
    tracker: &dyn IssueTracker,
    shadow: &[Ticket],
    edited: &[Ticket],
) -> Reconciliation {
    let patches = match diff(shadow, edited) {
        Ok(patches) => patches,
        Err(outcome) => {
            warn!(?outcome, "edits not reconciled");
            return Reconciliation::unchanged(shadow, outcome);
        }
    };

    if patches.is_empty() {
        return Reconciliation::unchanged(shadow, Outcome::NoChanges);
    }

    let mut committed = shadow.to_vec();
    let mut applied = Vec::with_capacity(patches.len());

    for (id, patch) in patches {
        if let Err(e) = tracker.update_issue(id, &patch).await {
            warn!(%id, error = %e, "update failed, stopping batch");
            return Reconciliation {
                table: committed,
                applied,
                outcome: Outcome::UpdateFailed {
                    id,
                    reason: e.to_string(),
                },
            };
        }
        if let Some(row) = committed.iter_mut().find(|t| t.id == id) {
            patch.apply_to(row);
        }
        info!(%id, "ticket updated");
        applied.push(id);
    }

    let by_id: HashMap<TicketId, &Ticket> = committed.iter().map(|t| (t.id, t)).collect();
    let table = edited
        .iter()
        .filter_map(|row| by_id.get(&row.id).map(|&t| t.clone()))
        .collect();

    Reconciliation {
        table,
        applied,
        outcome: Outcome::Committed,
    }
}
