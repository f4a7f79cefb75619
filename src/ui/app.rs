use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::db::storage::KeyValueStorage;
use crate::form::{ExpenseForm, FormField};
use crate::models::{category::CategoryFilter, expense::Expense};
use crate::store::ExpenseStore;
use crate::utils::csv::export_csv;
use crate::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
}

#[derive(Debug)]
pub struct App<S: KeyValueStorage> {
    pub store: ExpenseStore<S>,
    pub form: ExpenseForm,
    pub filter: CategoryFilter,
    pub list_state: ListState,
    pub input_mode: InputMode,
    pub status: Option<String>,
    pub currency_suffix: String,
    pub export_path: String,
    pub should_quit: bool,
}

impl<S: KeyValueStorage> App<S> {
    pub fn new(store: ExpenseStore<S>, settings: &Settings) -> Self {
        let mut list_state = ListState::default();
        if !store.expenses().is_empty() {
            list_state.select(Some(0));
        }

        Self {
            store,
            form: ExpenseForm::default(),
            filter: CategoryFilter::All,
            list_state,
            input_mode: InputMode::Normal,
            status: None,
            currency_suffix: settings.currency_suffix.clone(),
            export_path: settings.export_path.clone(),
            should_quit: false,
        }
    }

    pub fn visible(&self) -> Vec<&Expense> {
        view::filter_expenses(self.store.expenses(), &self.filter)
    }

    pub fn category_options(&self) -> Vec<String> {
        view::category_options(self.store.expenses())
    }

    pub fn total(&self) -> Option<Decimal> {
        view::total(self.visible())
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        let idx = self.list_state.selected()?;
        self.visible().get(idx).copied()
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        };
        self.list_state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        let selected = match (self.list_state.selected(), len) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn submit_form(&mut self) {
        let draft = self.form.draft();
        match self.store.add(&draft) {
            Ok(Some(_)) => {
                self.form.reset();
                self.status = Some("Expense added".to_string());
            }
            // Incomplete drafts are ignored and the form keeps its input.
            Ok(None) => {}
            Err(e) => {
                tracing::error!("failed to persist expenses: {e}");
                self.form.reset();
                self.status = Some(format!("Could not save: {e}"));
            }
        }
        self.clamp_selection();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_expense().map(|e| e.id) else {
            return;
        };
        match self.store.delete(id) {
            Ok(_) => self.status = Some("Expense deleted".to_string()),
            Err(e) => {
                tracing::error!("failed to persist expenses: {e}");
                self.status = Some(format!("Could not save: {e}"));
            }
        }
        self.clamp_selection();
    }

    pub fn next_filter(&mut self) {
        self.filter = self.filter.next(&self.category_options());
        self.list_state.select(None);
        self.clamp_selection();
    }

    pub fn previous_filter(&mut self) {
        self.filter = self.filter.previous(&self.category_options());
        self.list_state.select(None);
        self.clamp_selection();
    }

    pub fn export_visible(&mut self) {
        let path = self.export_path.clone();
        let result = export_csv(&path, self.visible());
        self.status = Some(match result {
            Ok(count) => {
                tracing::info!(count, path = %path, "exported expenses");
                format!("Exported {count} expenses to {path}")
            }
            Err(e) => {
                tracing::error!("failed to export expenses to {path}: {e}");
                format!("Export failed: {e}")
            }
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Form => self.handle_form_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        self.status = None;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.input_mode = InputMode::Form,
            KeyCode::Up => self.previous(),
            KeyCode::Down => self.next(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('f') => self.next_filter(),
            KeyCode::Char('F') => self.previous_filter(),
            KeyCode::Char('x') => self.export_visible(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Right if self.form.focus == FormField::Category => {
                let options = self.category_options();
                self.form.cycle_category(&options);
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.fill_today();
            }
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }
}
