use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use contact_manager::models::{Client, ClientUpdate, NewClient};

pub enum ClientFormAction {
    Cancel,
    Create(NewClient),
    Update(i32, ClientUpdate),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ClientField {
    FirstName,
    LastName,
    Email,
    Phones,
}

pub struct ClientFormState {
    original: Option<Client>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Comma separated, only used when creating
    pub phones: String,
    pub current_field: ClientField,
    pub editing: bool,
    pub status: Option<String>,
}

impl Default for ClientFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFormState {
    pub fn new() -> Self {
        Self {
            original: None,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phones: String::new(),
            current_field: ClientField::FirstName,
            editing: false,
            status: None,
        }
    }

    pub fn from_existing(client: Client) -> Self {
        Self {
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            email: client.email.clone(),
            phones: String::new(),
            original: Some(client),
            current_field: ClientField::FirstName,
            editing: false,
            status: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.original.is_none()
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    fn fields(&self) -> &'static [ClientField] {
        if self.is_new() {
            &[
                ClientField::FirstName,
                ClientField::LastName,
                ClientField::Email,
                ClientField::Phones,
            ]
        } else {
            &[ClientField::FirstName, ClientField::LastName, ClientField::Email]
        }
    }

    fn field_position(&self) -> usize {
        self.fields()
            .iter()
            .position(|f| *f == self.current_field)
            .unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        self.current_field = fields[(self.field_position() + 1) % fields.len()];
    }

    pub fn previous_field(&mut self) {
        let fields = self.fields();
        self.current_field = fields[(self.field_position() + fields.len() - 1) % fields.len()];
    }

    fn field_value_mut(&mut self, field: ClientField) -> &mut String {
        match field {
            ClientField::FirstName => &mut self.first_name,
            ClientField::LastName => &mut self.last_name,
            ClientField::Email => &mut self.email,
            ClientField::Phones => &mut self.phones,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = self.field_value_mut(self.current_field);
        match key {
            KeyCode::Char(c) => {
                field_value.push(c);
            }
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
    }

    fn phone_list(&self) -> Vec<String> {
        self.phones
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The action saving this form would perform
    pub fn save_action(&self) -> ClientFormAction {
        match &self.original {
            None => ClientFormAction::Create(NewClient {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email: self.email.trim().to_string(),
                phones: self.phone_list(),
            }),
            Some(original) => {
                let changed = |new: &str, old: &str| -> Option<String> {
                    let new = new.trim();
                    (new != old).then(|| new.to_string())
                };
                ClientFormAction::Update(
                    original.id,
                    ClientUpdate {
                        first_name: changed(self.first_name.as_str(), original.first_name.as_str()),
                        last_name: changed(self.last_name.as_str(), original.last_name.as_str()),
                        email: changed(self.email.as_str(), original.email.as_str()),
                    },
                )
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}

pub fn render_client_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(4)].as_ref())
        .split(f.size());

    let title_text = if state.is_new() { "New Client" } else { "Edit Client" };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Stop editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save client | Esc - Cancel"
    };

    let mut lines = vec![Spans::from(help_text)];
    if let Some(status) = &state.status {
        lines.push(Spans::from(Span::styled(status.as_str(), Style::default().fg(Color::Yellow))));
    }

    let help = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ClientFormState, area: Rect) {
    let items: Vec<ListItem> = state
        .fields()
        .iter()
        .map(|field| {
            let (name, value) = match field {
                ClientField::FirstName => ("First name", &state.first_name),
                ClientField::LastName => ("Last name", &state.last_name),
                ClientField::Email => ("Email", &state.email),
                ClientField::Phones => ("Phones (comma separated)", &state.phones),
            };

            let selected = *field == state.current_field;
            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value.as_str()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items).block(Block::default().borders(Borders::ALL).title("Client Details"));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ClientFormState) -> Result<Option<ClientFormAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

pub fn handle_key(state: &mut ClientFormState, code: KeyCode) -> Option<ClientFormAction> {
    match code {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ClientFormAction::Cancel);
            }
        }
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => {
            if state.is_valid() {
                return Some(state.save_action());
            }
            state.set_status("First name, last name and email are required");
        }
        _ if state.editing => state.edit_current_field(code),
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut ClientFormState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn new_form_creates_client_with_phones() {
        let mut state = ClientFormState::new();
        type_text(&mut state, "Ivan");
        handle_key(&mut state, KeyCode::Down);
        type_text(&mut state, "Petrov");
        handle_key(&mut state, KeyCode::Down);
        type_text(&mut state, "ivan@example.com");
        handle_key(&mut state, KeyCode::Down);
        type_text(&mut state, "111, 222,");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ClientFormAction::Create(client)) => {
                assert_eq!(client.first_name, "Ivan");
                assert_eq!(client.last_name, "Petrov");
                assert_eq!(client.email, "ivan@example.com");
                assert_eq!(client.phones, vec!["111", "222"]);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn default_form_is_a_blank_new_client() {
        let state = ClientFormState::default();

        assert!(state.is_new());
        assert_eq!(state.current_field, ClientField::FirstName);
        assert!(!state.editing);
        assert!(!state.is_valid());
    }

    #[test]
    fn incomplete_form_is_not_saved() {
        let mut state = ClientFormState::new();
        type_text(&mut state, "Ivan");

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert!(state.status.is_some());
    }

    #[test]
    fn edit_sends_only_changed_fields() {
        let mut state = ClientFormState::from_existing(Client {
            id: 8,
            first_name: "Alena".to_string(),
            last_name: "Smirnova".to_string(),
            email: "alena@example.com".to_string(),
            phones: vec!["+79001112233".to_string()],
        });
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Enter);
        for _ in 0.."Smirnova".len() {
            handle_key(&mut state, KeyCode::Backspace);
        }
        for c in "Ivanova".chars() {
            handle_key(&mut state, KeyCode::Char(c));
        }
        handle_key(&mut state, KeyCode::Enter);

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ClientFormAction::Update(8, update)) => {
                assert_eq!(update.last_name.as_deref(), Some("Ivanova"));
                assert!(update.first_name.is_none());
                assert!(update.email.is_none());
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn edit_form_skips_phone_field() {
        let mut state = ClientFormState::from_existing(Client {
            id: 1,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@x.com".to_string(),
            phones: Vec::new(),
        });
        handle_key(&mut state, KeyCode::Up);
        assert_eq!(state.current_field, ClientField::Email);
        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.current_field, ClientField::FirstName);
    }
}
