use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_PREFIX: &str = "ISSUE-";

/// Local handle for a remote issue. Rendered as `ISSUE-<number>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId(u64);

impl TicketId {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// The remote issue number.
    pub fn number(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ticket id {0:?}, expected ISSUE-<number>")]
pub struct TicketIdError(pub String);

impl FromStr for TicketId {
    type Err = TicketIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(TicketId)
            .ok_or_else(|| TicketIdError(s.to_string()))
    }
}

impl TryFrom<String> for TicketId {
    type Error = TicketIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TicketId> for String {
    fn from(id: TicketId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Closed => "Closed",
        }
    }

    /// Maps a remote issue state. Only `closed` is recognised; everything else is open.
    pub fn from_remote(state: &str) -> Self {
        if state == "closed" {
            Status::Closed
        } else {
            Status::Open
        }
    }

    /// Remote state for a write-back. Lossy: the tracker has no "in progress"
    /// state, so `InProgress` is sent as `open`.
    pub fn to_remote(self) -> &'static str {
        match self {
            Status::Closed => "closed",
            Status::Open | Status::InProgress => "open",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Status::Open => Status::InProgress,
            Status::InProgress => Status::Closed,
            Status::Closed => Status::Open,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single label carried by a ticket. Remote labels outside the known set are
/// kept verbatim so the table shows what the tracker actually holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Bug,
    Credential,
    Feature,
    #[default]
    Enhancement,
    Other(String),
}

impl Label {
    pub fn as_str(&self) -> &str {
        match self {
            Label::Bug => "bug",
            Label::Credential => "credential",
            Label::Feature => "feature",
            Label::Enhancement => "enhancement",
            Label::Other(name) => name,
        }
    }

    /// Cycles through the known labels. An unknown label moves to the first one.
    pub fn next(&self) -> Self {
        match self {
            Label::Bug => Label::Credential,
            Label::Credential => Label::Feature,
            Label::Feature => Label::Enhancement,
            Label::Enhancement | Label::Other(_) => Label::Bug,
        }
    }

    /// Parses one of the four known labels; anything else is rejected.
    pub fn parse_known(s: &str) -> Option<Self> {
        match Label::from(s.to_string()) {
            Label::Other(_) => None,
            label => Some(label),
        }
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bug" => Label::Bug,
            "credential" => Label::Credential,
            "feature" => Label::Feature,
            "enhancement" => Label::Enhancement,
            _ => Label::Other(name),
        }
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub status: Status,
    pub label: Label,
    pub date_submitted: NaiveDate,
}

/// The mutable fields of one ticket that should be pushed to the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    pub status: Option<Status>,
    pub title: Option<String>,
    pub label: Option<Label>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.title.is_none() && self.label.is_none()
    }

    /// Writes the patched fields onto `ticket`. Id and date are never touched.
    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(title) = &self.title {
            ticket.title = title.clone();
        }
        if let Some(label) = &self.label {
            ticket.label = label.clone();
        }
    }
}
