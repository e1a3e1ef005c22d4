mod cli;
mod ui;

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use contact_manager::{config, db, demo, logging, report};
use contact_manager::db::{ClientFilter, Database};

use crate::cli::{Cli, Command};
use crate::ui::{
    client_form::{handle_input as handle_form_input, render_client_form, ClientFormAction, ClientFormState},
    clients::{handle_input as handle_clients_input, render_clients, ClientAction, ClientsState},
};

// Represents the current screen of the browser
enum AppScreen {
    Clients,
    ClientForm,
}

// Browser state
struct AppState<'a> {
    db: &'a Database,
    screen: AppScreen,
    clients_state: ClientsState,
    form_state: Option<ClientFormState>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?.with_database_url(cli.database_url.clone());

    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Command::Browse, false) => "warn",
        _ => "info",
    };
    logging::init(config.log_format, default_level)?;

    let db = db::init(&config).await?;
    info!("database connection established");

    let result = run_command(&db, cli.command).await;
    db.close().await;
    result
}

async fn run_command(db: &Database, command: Command) -> Result<()> {
    let mut stdout = io::stdout().lock();

    match command {
        Command::Init => {
            // db::init already created the tables
            writeln!(stdout, "schema ready")?;
        }
        Command::Add {
            first,
            last,
            email,
            phones,
        } => {
            let id = db.create_client(&cli::new_client(first, last, email, phones)).await?;
            writeln!(stdout, "{}", id)?;
        }
        Command::AddPhone { client_id, phone } => {
            db.add_phone(client_id, &phone).await?;
        }
        Command::Update {
            client_id,
            first,
            last,
            email,
        } => {
            db.update_client(client_id, &cli::client_update(first, last, email)).await?;
        }
        Command::DeletePhone { client_id, phone } => {
            db.delete_phone(client_id, &phone).await?;
        }
        Command::Delete { client_id } => {
            db.delete_client(client_id).await?;
        }
        Command::Find(args) => {
            let clients = db.find_clients(&args.filter()).await?;
            if args.json {
                report::write_clients_json(&mut stdout, &clients)?;
            } else {
                report::write_clients(&mut stdout, &clients)?;
            }
        }
        Command::Demo { reset } => {
            demo::run(db, &mut stdout, reset).await?;
        }
        Command::Browse => {
            drop(stdout);
            browse(db).await?;
        }
    }

    Ok(())
}

async fn browse(db: &Database) -> Result<()> {
    let clients = db.find_clients(&ClientFilter::all()).await?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState {
        db,
        screen: AppScreen::Clients,
        clients_state: ClientsState::new(clients),
        form_state: None,
    };

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState<'_>) -> Result<()> {
    loop {
        terminal.draw(|f| match app_state.screen {
            AppScreen::Clients => render_clients(f, &mut app_state.clients_state),
            AppScreen::ClientForm => {
                if let Some(state) = &mut app_state.form_state {
                    render_client_form(f, state);
                }
            }
        })?;

        let should_quit = match app_state.screen {
            AppScreen::Clients => handle_clients_screen(app_state).await?,
            AppScreen::ClientForm => handle_form_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

async fn reload_clients(app_state: &mut AppState<'_>) -> Result<()> {
    let clients = app_state.db.find_clients(&ClientFilter::all()).await?;
    app_state.clients_state.reload(clients);
    Ok(())
}

async fn handle_clients_screen(app_state: &mut AppState<'_>) -> Result<bool> {
    let db = app_state.db;
    let outcome = match handle_clients_input(&mut app_state.clients_state)? {
        Some(ClientAction::Exit) => return Ok(true),
        Some(ClientAction::Reload) => Ok(()),
        Some(ClientAction::NewClient) => {
            app_state.form_state = Some(ClientFormState::new());
            app_state.screen = AppScreen::ClientForm;
            return Ok(false);
        }
        Some(ClientAction::EditClient(client)) => {
            app_state.form_state = Some(ClientFormState::from_existing(client));
            app_state.screen = AppScreen::ClientForm;
            return Ok(false);
        }
        Some(ClientAction::DeleteClient(id)) => db.delete_client(id).await,
        Some(ClientAction::AddPhone(id, phone)) => db.add_phone(id, &phone).await,
        Some(ClientAction::DeletePhone(id, phone)) => db.delete_phone(id, &phone).await,
        None => return Ok(false),
    };

    // Storage errors such as a missing client are shown, not fatal
    match outcome {
        Ok(()) => app_state.clients_state.clear_status(),
        Err(err) => app_state.clients_state.set_status(err.to_string()),
    }
    reload_clients(app_state).await?;

    Ok(false)
}

async fn handle_form_screen(app_state: &mut AppState<'_>) -> Result<bool> {
    let Some(state) = &mut app_state.form_state else {
        app_state.screen = AppScreen::Clients;
        return Ok(false);
    };

    let outcome = match handle_form_input(state)? {
        Some(ClientFormAction::Cancel) => Ok(()),
        Some(ClientFormAction::Create(client)) => app_state.db.create_client(&client).await.map(|_| ()),
        Some(ClientFormAction::Update(id, update)) => app_state.db.update_client(id, &update).await,
        None => return Ok(false),
    };

    match outcome {
        // A duplicate email keeps the form open so it can be corrected
        Err(err) => state.set_status(err.to_string()),
        Ok(()) => {
            app_state.form_state = None;
            app_state.screen = AppScreen::Clients;
            reload_clients(app_state).await?;
        }
    }

    Ok(false)
}
