use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use contact_manager::models::Client;

// Represents the state of the client list screen
pub struct ClientsState {
    clients: Vec<Client>,
    list_state: ListState,
    phone_index: usize,
    phone_input: Option<String>,
    show_delete_confirmation: bool,
    status: Option<String>,
}

impl ClientsState {
    pub fn new(clients: Vec<Client>) -> Self {
        let mut list_state = ListState::default();
        if !clients.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            clients,
            list_state,
            phone_index: 0,
            phone_input: None,
            show_delete_confirmation: false,
            status: None,
        }
    }

    /// Replace the list after a reload, keeping the selection on the same client when it still exists
    pub fn reload(&mut self, clients: Vec<Client>) {
        let selected_id = self.selected_client_id();
        self.clients = clients;

        let index = selected_id
            .and_then(|id| self.clients.iter().position(|c| c.id == id))
            .or(if self.clients.is_empty() { None } else { Some(0) });
        self.list_state.select(index);
        self.clamp_phone_index();
    }

    pub fn next(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.clients.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
        self.phone_index = 0;
    }

    pub fn previous(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.clients.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
        self.phone_index = 0;
    }

    pub fn next_phone(&mut self) {
        let count = self.selected_client().map_or(0, |c| c.phones.len());
        if count > 0 {
            self.phone_index = (self.phone_index + 1) % count;
        }
    }

    fn clamp_phone_index(&mut self) {
        let count = self.selected_client().map_or(0, |c| c.phones.len());
        if self.phone_index >= count {
            self.phone_index = count.saturating_sub(1);
        }
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.list_state.selected().and_then(|i| self.clients.get(i))
    }

    pub fn selected_client_id(&self) -> Option<i32> {
        self.selected_client().map(|c| c.id)
    }

    pub fn selected_phone(&self) -> Option<&str> {
        self.selected_client()
            .and_then(|c| c.phones.get(self.phone_index))
            .map(String::as_str)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    fn is_modal(&self) -> bool {
        self.show_delete_confirmation || self.phone_input.is_some()
    }
}

pub enum ClientAction {
    Exit,
    Reload,
    NewClient,
    EditClient(Client),
    DeleteClient(i32),
    AddPhone(i32, String),
    DeletePhone(i32, String),
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(chunks[0]);

    let items: Vec<ListItem> = state
        .clients
        .iter()
        .map(|client| {
            ListItem::new(Spans::from(vec![
                Span::raw(client.full_name()),
                Span::styled(format!("  <{}>", client.email), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let clients_list = List::new(items)
        .block(Block::default().title("Clients").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(clients_list, panes[0], &mut state.list_state);

    render_phones(frame, state, panes[1]);

    let help = if state.selected_client().is_some() {
        "<N> New | <E> Edit | <D> Delete | <P> Add phone | <Tab> Next phone | <X> Remove phone | <R> Reload | <Q> Quit"
    } else {
        "<N> New | <R> Reload | <Q> Quit"
    };

    let mut lines = vec![Spans::from(help)];
    if let Some(status) = &state.status {
        lines.push(Spans::from(Span::styled(status.as_str(), Style::default().fg(Color::Yellow))));
    }

    let buttons = Paragraph::new(lines)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }

    if let Some(input) = &state.phone_input {
        render_phone_input(frame, size, input);
    }
}

fn render_phones<B: Backend>(frame: &mut Frame<B>, state: &ClientsState, area: Rect) {
    let items: Vec<ListItem> = match state.selected_client() {
        Some(client) if !client.phones.is_empty() => client
            .phones
            .iter()
            .enumerate()
            .map(|(i, phone)| {
                let style = if i == state.phone_index {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Spans::from(Span::styled(phone.as_str(), style)))
            })
            .collect(),
        Some(_) => vec![ListItem::new("No phones")],
        None => Vec::new(),
    };

    let phones = List::new(items).block(Block::default().title("Phones").borders(Borders::ALL));
    frame.render_widget(phones, area);
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this client?"),
        Spans::from(""),
        Spans::from("All of the client's phones will also be deleted."),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

fn render_phone_input<B: Backend>(frame: &mut Frame<B>, size: Rect, input: &str) {
    let popup_area = centered_rect(40, 15, size);

    let popup = Paragraph::new(vec![
        Spans::from(format!("{}|", input)),
        Spans::from(""),
        Spans::from("<Enter> Add  <Esc> Cancel"),
    ])
    .block(Block::default().title("New Phone").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

pub fn handle_key(state: &mut ClientsState, code: KeyCode) -> Option<ClientAction> {
    if let Some(input) = state.phone_input.as_mut() {
        match code {
            KeyCode::Esc => state.phone_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let phone = state.phone_input.take().unwrap_or_default();
                if let (Some(id), false) = (state.selected_client_id(), phone.is_empty()) {
                    return Some(ClientAction::AddPhone(id, phone));
                }
            }
            _ => {}
        }
        return None;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if state.show_delete_confirmation {
                state.toggle_delete_confirmation();
            } else {
                return Some(ClientAction::Exit);
            }
        }
        KeyCode::Char('n') => {
            if state.show_delete_confirmation {
                state.toggle_delete_confirmation();
            } else {
                return Some(ClientAction::NewClient);
            }
        }
        KeyCode::Char('e') if !state.is_modal() => {
            if let Some(client) = state.selected_client() {
                return Some(ClientAction::EditClient(client.clone()));
            }
        }
        KeyCode::Char('d') => {
            if !state.show_delete_confirmation && state.selected_client().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Char('y') => {
            if state.show_delete_confirmation {
                if let Some(id) = state.selected_client_id() {
                    state.toggle_delete_confirmation();
                    return Some(ClientAction::DeleteClient(id));
                }
            }
        }
        KeyCode::Char('p') if !state.is_modal() => {
            if state.selected_client().is_some() {
                state.phone_input = Some(String::new());
            }
        }
        KeyCode::Char('x') if !state.is_modal() => {
            if let (Some(id), Some(phone)) = (state.selected_client_id(), state.selected_phone()) {
                return Some(ClientAction::DeletePhone(id, phone.to_string()));
            }
        }
        KeyCode::Char('r') if !state.is_modal() => return Some(ClientAction::Reload),
        KeyCode::Tab if !state.is_modal() => state.next_phone(),
        KeyCode::Down if !state.is_modal() => state.next(),
        KeyCode::Up if !state.is_modal() => state.previous(),
        _ => {}
    }
    None
}
