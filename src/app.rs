use std::time::Instant;

use tracing::debug;

use crate::event::KeyAction;
use crate::model::ticket::{Label, Ticket};
use crate::store::TicketStore;

#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyAction),
    Tick,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Table,
    AddTicket,
    EditTitle,
}

pub struct App {
    pub store: TicketStore,
    pub selected: usize,
    pub mode: InputMode,
    pub input_buffer: String,
    /// Cursor position in `input_buffer`, counted in chars.
    pub input_cursor: usize,
    pub new_label: Label,
    pub loading: bool,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TicketStore) -> Self {
        Self {
            store,
            selected: 0,
            mode: InputMode::Table,
            input_buffer: String::new(),
            input_cursor: 0,
            new_label: Label::default(),
            loading: true,
            flash_message: None,
            should_quit: false,
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        self.store.tickets()
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.tickets().get(self.selected)
    }

    pub fn input_active(&self) -> bool {
        self.mode != InputMode::Table
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.store.initialize().await;
        self.loading = false;
        self.clamp_selection();
    }

    pub async fn update(&mut self, action: Action) {
        // Clear flash message after 4 seconds
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= 4 {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => match self.mode {
                InputMode::Table => self.handle_table_key(key).await,
                InputMode::AddTicket | InputMode::EditTitle => self.handle_input_key(key).await,
            },
            Action::Tick => {}
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    async fn handle_table_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyAction::Down => {
                if !self.tickets().is_empty() && self.selected < self.tickets().len() - 1 {
                    self.selected += 1;
                }
            }
            KeyAction::Char('q') => self.should_quit = true,
            KeyAction::Char('s') => {
                self.edit_selected(|t| t.status = t.status.next()).await;
            }
            KeyAction::Char('l') => {
                self.edit_selected(|t| t.label = t.label.next()).await;
            }
            KeyAction::Char('e') => {
                if let Some(title) = self.selected_ticket().map(|t| t.title.clone()) {
                    self.open_input(InputMode::EditTitle, title);
                }
            }
            KeyAction::Char('a') => {
                self.new_label = Label::default();
                self.open_input(InputMode::AddTicket, String::new());
            }
            KeyAction::Char('r') => self.refresh().await,
            _ => {}
        }
    }

    async fn handle_input_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Escape => self.close_input(),
            KeyAction::Select => self.submit_input().await,
            KeyAction::Tab if self.mode == InputMode::AddTicket => {
                self.new_label = self.new_label.next();
            }
            KeyAction::Char(c) => {
                let at = self.byte_offset(self.input_cursor);
                self.input_buffer.insert(at, c);
                self.input_cursor += 1;
            }
            KeyAction::Backspace => {
                if self.input_cursor > 0 {
                    self.input_cursor -= 1;
                    let at = self.byte_offset(self.input_cursor);
                    self.input_buffer.remove(at);
                }
            }
            KeyAction::Left => {
                self.input_cursor = self.input_cursor.saturating_sub(1);
            }
            KeyAction::Right => {
                if self.input_cursor < self.input_buffer.chars().count() {
                    self.input_cursor += 1;
                }
            }
            _ => {}
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    fn open_input(&mut self, mode: InputMode, initial: String) {
        self.input_cursor = initial.chars().count();
        self.input_buffer = initial;
        self.mode = mode;
    }

    fn close_input(&mut self) {
        self.mode = InputMode::Table;
        self.input_buffer.clear();
        self.input_cursor = 0;
    }

    async fn submit_input(&mut self) {
        match self.mode {
            InputMode::AddTicket => {
                let title = self.input_buffer.clone();
                match self.store.submit_new_ticket(&title, self.new_label.clone()).await {
                    Ok(ticket) => {
                        self.flash(format!("{} created", ticket.id));
                        self.selected = 0;
                        self.close_input();
                    }
                    // Keep the form open so the text is not lost.
                    Err(e) => self.flash(format!("Create failed: {e}")),
                }
            }
            InputMode::EditTitle => {
                let title = self.input_buffer.trim().to_string();
                self.close_input();
                if title.is_empty() {
                    self.flash("Title cannot be empty".into());
                    return;
                }
                self.edit_selected(|t| t.title = title).await;
            }
            InputMode::Table => {}
        }
    }

    /// Applies `f` to the selected row of a copy of the table and hands the
    /// copy to the store for reconciliation.
    async fn edit_selected(&mut self, f: impl FnOnce(&mut Ticket)) {
        let mut edited = self.tickets().to_vec();
        let Some(row) = edited.get_mut(self.selected) else {
            return;
        };
        f(row);
        debug!(id = %row.id, "cell edited");

        let result = self.store.apply_edits(&edited).await;
        if result.is_success() {
            self.flash(result.summary());
        } else {
            self.flash(format!("⚠ {}", result.summary()));
        }
        self.clamp_selection();
    }

    async fn refresh(&mut self) {
        self.loading = true;
        let count = self.store.refresh().await.len();
        self.loading = false;
        self.clamp_selection();
        self.flash(format!("Loaded {count} tickets"));
    }

    fn clamp_selection(&mut self) {
        let len = self.tickets().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ticket::{Status, TicketId};
    use crate::tracker::mock::{ticket, MockTracker};

    async fn app_with(tracker: &MockTracker) -> App {
        let mut app = App::new(TicketStore::new(tracker.boxed()));
        app.load().await;
        app
    }

    fn remote() -> MockTracker {
        MockTracker::with_issues(vec![
            ticket(2, "VPN access", Status::Open, Label::Credential),
            ticket(1, "Printer jam", Status::Open, Label::Bug),
        ])
    }

    async fn press(app: &mut App, key: KeyAction) {
        app.update(Action::Key(key)).await;
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyAction::Char(c)).await;
        }
    }

    #[tokio::test]
    async fn status_key_cycles_and_syncs_selected_row() {
        let tracker = remote();
        let mut app = app_with(&tracker).await;

        press(&mut app, KeyAction::Down).await;
        press(&mut app, KeyAction::Char('s')).await;

        assert_eq!(app.tickets()[1].status, Status::InProgress);
        let updates = tracker.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, TicketId::new(1));
        assert_eq!(updates[0].1.status, Some(Status::InProgress));
    }

    #[tokio::test]
    async fn failed_edit_shows_message_and_keeps_old_value() {
        let tracker = remote();
        tracker.fail_update(TicketId::new(2));
        let mut app = app_with(&tracker).await;

        press(&mut app, KeyAction::Char('l')).await;

        assert_eq!(app.tickets()[0].label, Label::Credential);
        let (msg, _) = app.flash_message.as_ref().unwrap();
        assert!(msg.contains("Failed to update ISSUE-2"));
    }

    #[tokio::test]
    async fn add_form_creates_ticket_with_chosen_label() {
        let tracker = remote();
        let mut app = app_with(&tracker).await;

        press(&mut app, KeyAction::Char('a')).await;
        type_text(&mut app, "Laptop quit").await;
        press(&mut app, KeyAction::Tab).await; // enhancement -> bug
        press(&mut app, KeyAction::Select).await;

        assert_eq!(app.mode, InputMode::Table);
        assert_eq!(app.tickets().len(), 3);
        assert_eq!(app.tickets()[0].title, "Laptop quit");
        assert_eq!(app.tickets()[0].label, Label::Bug);
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn failed_create_keeps_form_open() {
        let tracker = remote();
        tracker.fail_create();
        let mut app = app_with(&tracker).await;

        press(&mut app, KeyAction::Char('a')).await;
        type_text(&mut app, "Nope").await;
        press(&mut app, KeyAction::Select).await;

        assert_eq!(app.mode, InputMode::AddTicket);
        assert_eq!(app.input_buffer, "Nope");
        assert_eq!(app.tickets().len(), 2);
    }

    #[tokio::test]
    async fn title_edit_supports_cursor_movement() {
        let tracker = remote();
        let mut app = app_with(&tracker).await;

        press(&mut app, KeyAction::Char('e')).await;
        assert_eq!(app.input_buffer, "VPN access");
        for _ in 0.."access".len() {
            press(&mut app, KeyAction::Left).await;
        }
        type_text(&mut app, "é").await;
        press(&mut app, KeyAction::Backspace).await;
        type_text(&mut app, "no ").await;
        press(&mut app, KeyAction::Select).await;

        assert_eq!(app.tickets()[0].title, "VPN no access");
        assert_eq!(tracker.updates()[0].1.title.as_deref(), Some("VPN no access"));
    }

    #[tokio::test]
    async fn letters_in_input_mode_do_not_trigger_commands() {
        let tracker = remote();
        let mut app = app_with(&tracker).await;

        press(&mut app, KeyAction::Char('a')).await;
        type_text(&mut app, "qsr").await;

        assert!(!app.should_quit);
        assert_eq!(app.input_buffer, "qsr");
        assert!(tracker.updates().is_empty());
    }

    #[tokio::test]
    async fn refresh_clamps_selection() {
        let tracker = remote();
        let mut app = app_with(&tracker).await;
        press(&mut app, KeyAction::Down).await;
        tracker.set_issues(vec![ticket(5, "only", Status::Closed, Label::Feature)]);

        press(&mut app, KeyAction::Char('r')).await;

        assert_eq!(app.selected, 0);
        assert_eq!(app.tickets().len(), 1);
    }
}
