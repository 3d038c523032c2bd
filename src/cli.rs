use anyhow::{bail, Context, Result};

use crate::config;
use crate::model::ticket::{Label, Ticket};
use crate::stats;
use crate::store::TicketStore;
use crate::tracker;

async fn open_store() -> Result<TicketStore> {
    let config = config::load_config()?;
    let tracker = tracker::create_tracker(&config)?;
    Ok(TicketStore::new(tracker))
}

/// `tickets add <title> [-l <label>]`: create the ticket and print it.
pub async fn handle_add(args: &[String]) -> Result<()> {
    let (title, label) = parse_add_args(args)?;

    let mut store = open_store().await?;
    let ticket = store
        .submit_new_ticket(&title, label)
        .await
        .context("Failed to create ticket")?;

    println!("Created in {}:", store.tracker_name());
    print_table(std::slice::from_ref(&ticket));
    Ok(())
}

pub async fn handle_list() -> Result<()> {
    let mut store = open_store().await?;
    let tickets = store.initialize().await;
    println!("Number of tickets: {}", tickets.len());
    print_table(tickets);
    Ok(())
}

pub async fn handle_stats() -> Result<()> {
    let mut store = open_store().await?;
    let tickets = store.initialize().await;

    println!("Open tickets: {}", stats::open_count(tickets));
    println!();
    println!("Status per month:");
    for bucket in stats::status_by_month(tickets) {
        println!(
            "  {}  open {:>3}  in progress {:>3}  closed {:>3}",
            bucket.key(),
            bucket.open,
            bucket.in_progress,
            bucket.closed
        );
    }
    println!();
    println!("Labels:");
    for (label, count) in stats::label_distribution(tickets) {
        println!("  {:<12} {count}", label.as_str());
    }
    Ok(())
}

/// Parse `tickets add` arguments into (title, label).
///
/// Supported forms:
///   tickets add "Printer is on fire"
///   tickets add Printer is on fire -l bug
///   tickets add "VPN access" --label credential
pub fn parse_add_args(args: &[String]) -> Result<(String, Label)> {
    if args.is_empty() {
        bail!("Usage: tickets add <title> [-l <label>]\n\nLabels: bug, credential, feature, enhancement");
    }

    let mut title_parts: Vec<String> = Vec::new();
    let mut label = Label::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-l" | "--label" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    bail!("Missing value for -l/--label flag");
                };
                label = Label::parse_known(value).with_context(|| {
                    format!("Unknown label {value:?}; expected bug, credential, feature or enhancement")
                })?;
            }
            _ => {
                title_parts.push(args[i].clone());
            }
        }
        i += 1;
    }

    let title = title_parts.join(" ");
    if title.trim().is_empty() {
        bail!("Ticket title cannot be empty");
    }

    Ok((title, label))
}

fn print_table(tickets: &[Ticket]) {
    println!(
        "{:<12} {:<12} {:<12} {:<11} ISSUE",
        "ID", "STATUS", "LABEL", "SUBMITTED"
    );
    for t in tickets {
        println!(
            "{:<12} {:<12} {:<12} {:<11} {}",
            t.id.to_string(),
            t.status.as_str(),
            t.label.as_str(),
            t.date_submitted.to_string(),
            t.title
        );
    }
}

pub fn print_help() {
    println!("tickets — support ticket dashboard backed by GitHub issues\n");
    println!("USAGE:");
    println!("  tickets                Launch the dashboard");
    println!("  tickets list           Print all tickets");
    println!("  tickets add <title>    Create a ticket");
    println!("  tickets stats          Print ticket statistics");
    println!();
    println!("ADD OPTIONS:");
    println!("  -l, --label <label>    bug, credential, feature or enhancement (default)");
    println!();
    println!("CONFIG:");
    println!("  ~/.tickets/config.toml with a [github] section: owner, repo, token");
    println!("  GITHUB_TOKEN overrides the configured token");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_simple_title_defaults_to_enhancement() {
        let (title, label) = parse_add_args(&args(&["Printer is on fire"])).unwrap();
        assert_eq!(title, "Printer is on fire");
        assert_eq!(label, Label::Enhancement);
    }

    #[test]
    fn parse_multi_word_title() {
        let (title, _) = parse_add_args(&args(&["Printer", "is", "on", "fire"])).unwrap();
        assert_eq!(title, "Printer is on fire");
    }

    #[test]
    fn parse_short_label_flag() {
        let (title, label) = parse_add_args(&args(&["VPN down", "-l", "bug"])).unwrap();
        assert_eq!(title, "VPN down");
        assert_eq!(label, Label::Bug);
    }

    #[test]
    fn parse_long_label_flag_between_words() {
        let (title, label) =
            parse_add_args(&args(&["Reset", "--label", "credential", "password"])).unwrap();
        assert_eq!(title, "Reset password");
        assert_eq!(label, Label::Credential);
    }

    #[test]
    fn parse_unknown_label_fails() {
        let err = parse_add_args(&args(&["Docs", "-l", "documentation"])).unwrap_err();
        assert!(err.to_string().contains("Unknown label"));
    }

    #[test]
    fn parse_empty_args_fails() {
        assert!(parse_add_args(&args(&[])).is_err());
    }

    #[test]
    fn parse_only_flag_no_title_fails() {
        let err = parse_add_args(&args(&["-l", "bug"])).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn parse_missing_label_value_fails() {
        let err = parse_add_args(&args(&["Title", "-l"])).unwrap_err();
        assert!(err.to_string().contains("Missing value"));
    }

    #[test]
    fn parse_unicode_title() {
        let (title, _) = parse_add_args(&args(&["프린터 고장 🖨️"])).unwrap();
        assert_eq!(title, "프린터 고장 🖨️");
    }
}
