use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use expense_tracker::{
    config::{self, Command, Settings},
    models::category::CategoryFilter,
    ui::render,
    utils::csv::export_csv,
    view, App, DbConnection, ExpenseStore,
};

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("Failed to open log file {}", settings.log_file))?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("expense_tracker={}", settings.log_level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn run_export(settings: &Settings, output: Option<String>, category: Option<String>) -> Result<()> {
    let db = DbConnection::new(&settings.data_path)
        .with_context(|| format!("Failed to open {}", settings.data_path))?;
    let store = ExpenseStore::load(db);

    let filter = category.map(CategoryFilter::Only).unwrap_or_default();
    let visible = view::filter_expenses(store.expenses(), &filter);
    let path = output.unwrap_or_else(|| settings.export_path.clone());

    let count = export_csv(&path, visible)?;
    tracing::info!(count, path = %path, "exported expenses");
    println!("Exported {count} expenses to {path}");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<DbConnection>,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let size = f.size();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(6),
                    Constraint::Length(1),
                    Constraint::Min(3),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ].as_ref())
                .split(size);

            render::render_form(f, &app, chunks[0]);
            render::render_filter(f, &app, chunks[1]);
            render::render_expense_list(f, &app, chunks[2]);
            render::render_help_panel(f, &app, chunks[3]);
            render::render_status(f, &app, chunks[4]);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let (settings, args) = config::load()?;
    init_logging(&settings)?;

    if let Some(Command::Export { output, category }) = args.command {
        return run_export(&settings, output, category);
    }

    let db = DbConnection::new(&settings.data_path)
        .with_context(|| format!("Failed to open {}", settings.data_path))?;
    let app = App::new(ExpenseStore::load(db), &settings);
    tracing::info!(data_path = %settings.data_path, "starting expense tracker");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}
