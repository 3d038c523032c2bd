use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::model::ticket::{Label, Status, Ticket};

/// Ticket counts per status for one calendar month of submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl MonthBucket {
    fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            open: 0,
            in_progress: 0,
            closed: 0,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Closed => self.closed,
        }
    }

    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.closed
    }

    /// Short label such as `2024-05`.
    pub fn key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

pub fn open_count(tickets: &[Ticket]) -> usize {
    tickets.iter().filter(|t| t.status == Status::Open).count()
}

/// Status counts grouped by month of submission, oldest month first.
pub fn status_by_month(tickets: &[Ticket]) -> Vec<MonthBucket> {
    let mut months: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();
    for ticket in tickets {
        let (year, month) = (ticket.date_submitted.year(), ticket.date_submitted.month());
        let bucket = months
            .entry((year, month))
            .or_insert_with(|| MonthBucket::new(year, month));
        match ticket.status {
            Status::Open => bucket.open += 1,
            Status::InProgress => bucket.in_progress += 1,
            Status::Closed => bucket.closed += 1,
        }
    }
    months.into_values().collect()
}

/// Number of tickets per label, most common first. Ties are broken by name.
pub fn label_distribution(tickets: &[Ticket]) -> Vec<(Label, usize)> {
    let mut counts: HashMap<&Label, usize> = HashMap::new();
    for ticket in tickets {
        *counts.entry(&ticket.label).or_default() += 1;
    }
    let mut dist: Vec<(Label, usize)> = counts
        .into_iter()
        .map(|(label, n)| (label.clone(), n))
        .collect();
    dist.sort_by(|(la, a), (lb, b)| b.cmp(a).then_with(|| la.as_str().cmp(lb.as_str())));
    dist
}
