use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::IssueTracker;
use crate::error::TrackerError;
use crate::model::ticket::{Label, Status, Ticket, TicketId, TicketPatch};

/// Call recorded by [`MockTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(String, Label),
    Update(TicketId, TicketPatch),
}

/// In-memory tracker that records every call. Clones share the same state,
/// so a test can keep one handle after boxing the other into a store.
#[derive(Clone, Default)]
pub struct MockTracker {
    pub calls: Arc<Mutex<Vec<Call>>>,
    issues: Arc<Mutex<Vec<Ticket>>>,
    fail_list: Arc<Mutex<bool>>,
    fail_create: Arc<Mutex<bool>>,
    fail_updates: Arc<Mutex<HashSet<TicketId>>>,
    next_number: Arc<Mutex<u64>>,
}

impl MockTracker {
    pub fn with_issues(issues: Vec<Ticket>) -> Self {
        let next = issues.iter().map(|t| t.id.number()).max().unwrap_or(0) + 1;
        let mock = Self::default();
        *mock.issues.lock().unwrap() = issues;
        *mock.next_number.lock().unwrap() = next;
        mock
    }

    pub fn fail_list(&self) {
        *self.fail_list.lock().unwrap() = true;
    }

    pub fn fail_create(&self) {
        *self.fail_create.lock().unwrap() = true;
    }

    pub fn fail_update(&self, id: TicketId) {
        self.fail_updates.lock().unwrap().insert(id);
    }

    pub fn set_issues(&self, issues: Vec<Ticket>) {
        *self.issues.lock().unwrap() = issues;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(TicketId, TicketPatch)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(id, patch) => Some((id, patch)),
                _ => None,
            })
            .collect()
    }

    pub fn boxed(&self) -> Box<dyn IssueTracker> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn list_issues(&self) -> Result<Vec<Ticket>, TrackerError> {
        self.calls.lock().unwrap().push(Call::List);
        if *self.fail_list.lock().unwrap() {
            return Err(TrackerError::Status {
                status: 500,
                body: "Mock failure".into(),
            });
        }
        Ok(self.issues.lock().unwrap().clone())
    }

    async fn create_issue(&self, title: &str, label: &Label) -> Result<Ticket, TrackerError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(title.to_string(), label.clone()));
        if *self.fail_create.lock().unwrap() {
            return Err(TrackerError::Status {
                status: 422,
                body: "Mock failure".into(),
            });
        }
        let mut next = self.next_number.lock().unwrap();
        *next = (*next).max(1);
        let ticket = Ticket {
            id: TicketId::new(*next),
            title: title.to_string(),
            status: Status::Open,
            label: label.clone(),
            date_submitted: date(2024, 6, 1),
        };
        *next += 1;
        self.issues.lock().unwrap().insert(0, ticket.clone());
        Ok(ticket)
    }

    async fn update_issue(&self, id: TicketId, patch: &TicketPatch) -> Result<(), TrackerError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id, patch.clone()));
        if self.fail_updates.lock().unwrap().contains(&id) {
            return Err(TrackerError::Status {
                status: 404,
                body: "Mock failure".into(),
            });
        }
        if let Some(issue) = self.issues.lock().unwrap().iter_mut().find(|t| t.id == id) {
            patch.apply_to(issue);
            // The remote side only knows open and closed.
            issue.status = Status::from_remote(issue.status.to_remote());
        }
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ticket(number: u64, title: &str, status: Status, label: Label) -> Ticket {
    Ticket {
        id: TicketId::new(number),
        title: title.to_string(),
        status,
        label,
        date_submitted: date(2024, 5, number as u32 % 28 + 1),
    }
}
