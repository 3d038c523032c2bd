use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::IssueTracker;
use crate::config::GitHubConfig;
use crate::error::TrackerError;
use crate::model::ticket::{Label, Status, Ticket, TicketId, TicketPatch};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("tickets/", env!("CARGO_PKG_VERSION"));

pub struct GitHubTracker {
    issues_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl GitHubTracker {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("No GitHub token configured. Set GITHUB_TOKEN or github.token in config.toml")?;
        let api_url = config
            .api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/');
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            issues_url: format!("{api_url}/repos/{}/{}/issues", config.owner, config.repo),
            auth_header: format!("Bearer {token}"),
            client,
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

#[derive(Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    created_at: DateTime<Utc>,
    /// Present when the "issue" is actually a pull request.
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GhLabel {
    name: String,
}

#[derive(Serialize)]
struct NewIssue<'a> {
    title: &'a str,
    body: &'a str,
    labels: [&'a str; 1],
}

#[derive(Serialize, Default, Debug, PartialEq)]
struct IssueUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<[&'a str; 1]>,
}

impl<'a> From<&'a TicketPatch> for IssueUpdate<'a> {
    fn from(patch: &'a TicketPatch) -> Self {
        IssueUpdate {
            state: patch.status.map(Status::to_remote),
            title: patch.title.as_deref(),
            labels: patch.label.as_ref().map(|l| [l.as_str()]),
        }
    }
}

fn ticket_from_issue(issue: GhIssue) -> Ticket {
    let label = issue
        .labels
        .into_iter()
        .next()
        .map(|l| Label::from(l.name))
        .unwrap_or_default();

    Ticket {
        id: TicketId::new(issue.number),
        title: issue.title,
        status: Status::from_remote(&issue.state),
        label,
        date_submitted: issue.created_at.date_naive(),
    }
}

async fn status_error(resp: reqwest::Response) -> TrackerError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    TrackerError::Status {
        status,
        body: body.chars().take(200).collect(),
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn list_issues(&self) -> Result<Vec<Ticket>, TrackerError> {
        debug!(url = %self.issues_url, "listing issues");
        let resp = self
            .request(reqwest::Method::GET, &self.issues_url)
            .query(&[("state", "all"), ("per_page", "100")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let issues: Vec<GhIssue> = resp.json().await?;
        let tickets = issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .map(ticket_from_issue)
            .collect();
        Ok(tickets)
    }

    async fn create_issue(&self, title: &str, label: &Label) -> Result<Ticket, TrackerError> {
        let body = NewIssue {
            title,
            body: title,
            labels: [label.as_str()],
        };
        debug!(%label, "creating issue");
        let resp = self
            .request(reqwest::Method::POST, &self.issues_url)
            .json(&body)
            .send()
            .await?;

        if resp.status() != StatusCode::CREATED {
            return Err(status_error(resp).await);
        }

        let issue: GhIssue = resp.json().await?;
        let mut ticket = ticket_from_issue(issue);
        // The tracker may return labels in any order; keep the one the user picked.
        ticket.status = Status::Open;
        ticket.label = label.clone();
        Ok(ticket)
    }

    async fn update_issue(&self, id: TicketId, patch: &TicketPatch) -> Result<(), TrackerError> {
        let url = format!("{}/{}", self.issues_url, id.number());
        let body = IssueUpdate::from(patch);
        debug!(%id, ?body, "updating issue");
        let resp = self
            .request(reqwest::Method::PATCH, &url)
            .json(&body)
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            let err = status_error(resp).await;
            warn!(%id, error = %err, "issue update rejected");
            return Err(err);
        }
        Ok(())
    }
}
