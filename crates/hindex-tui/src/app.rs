// TUI application state and event handling
use crate::view::{project, ViewModel};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hindex_core::config::UiConfig;
use hindex_core::prompt::{self, Answered};
use hindex_core::{Config, Exporter, Focus, Outcome, StateStore};
use rand::Rng;
use ratatui::widgets::TableState;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,             // Moving around the table
    EditingTitle,       // Typing into the selected title
    EditingCitations,   // Typing into the selected citation count
    NamingCollection,   // New collection name prompt
    RenamingCollection, // Rename prompt for the active collection
    Confirming,         // Yes/no modal
    Notice,             // Message the user has to dismiss
    Help,
}

/// Destructive action waiting on a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    ClearCollection,
    DeleteCollection(String),
}

pub struct App {
    pub store: StateStore,
    pub ui: UiConfig,
    pub export_file: PathBuf,
    pub view: ViewModel,
    pub selected: usize,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub pending: Option<PendingAction>,
    pub confirm_prompt: String,
    pub notice: Option<String>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub table_state: TableState,
}

impl App {
    pub fn new(store: StateStore, config: &Config) -> Self {
        let view = project(store.state(), config.ui.chart_floor);
        let mut app = Self {
            store,
            ui: config.ui.clone(),
            export_file: PathBuf::from(&config.export.file_name),
            view,
            selected: 0,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            pending: None,
            confirm_prompt: String::new(),
            notice: None,
            status_message: None,
            should_quit: false,
            table_state: TableState::default(),
        };
        app.clamp_selection();
        app
    }

    /// Called once the first frame is on screen
    pub fn mark_ready(&mut self) {
        self.store.mark_ui_ready();
        self.sync_view();
    }

    /// Rebuild the view if the store asked for it, then apply any focus request
    pub fn sync_view(&mut self) {
        let Some(request) = self.store.take_render_request() else {
            return;
        };

        self.view = project(self.store.state(), self.ui.chart_floor);
        self.clamp_selection();

        match request.focus {
            Some(Focus::FirstTitle) => self.select(0),
            Some(Focus::LastTitle) => {
                self.select(self.view.rows.len().saturating_sub(1));
                self.start_editing_title();
            }
            None => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditingTitle => self.handle_title_key(key),
            InputMode::EditingCitations => self.handle_citations_key(key),
            InputMode::NamingCollection | InputMode::RenamingCollection => {
                self.handle_name_key(key)
            }
            InputMode::Confirming => self.handle_confirm_key(key),
            InputMode::Notice => {
                self.notice = None;
                self.input_mode = InputMode::Normal;
            }
            InputMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.input_mode = InputMode::Normal;
                }
            }
        }

        self.sync_view();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.next_row(),
            KeyCode::Char('k') | KeyCode::Up => self.previous_row(),
            KeyCode::Tab | KeyCode::Char(']') => self.cycle_collection(1),
            KeyCode::BackTab | KeyCode::Char('[') => self.cycle_collection(-1),
            KeyCode::Char('a') => {
                let result = self.store.add_article_and_focus();
                self.apply(result);
            }
            KeyCode::Char('s') => {
                let citations = rand::thread_rng().gen_range(0..50);
                let result = self.store.add_sample(citations);
                self.apply(result);
                // Clamped against the new rows once the view is rebuilt
                self.selected = self.store.state().active().articles.len().saturating_sub(1);
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let result = self.store.remove_article(self.selected);
                self.apply(result);
            }
            KeyCode::Enter | KeyCode::Char('t') => self.start_editing_title(),
            KeyCode::Char('c') => self.start_editing_citations(),
            KeyCode::Char('n') => {
                self.edit_buffer.clear();
                self.input_mode = InputMode::NamingCollection;
            }
            KeyCode::Char('r') => {
                self.edit_buffer = self.store.current().to_string();
                self.input_mode = InputMode::RenamingCollection;
            }
            KeyCode::Char('D') => {
                let name = self.store.current().to_string();
                self.confirm(prompt::delete_prompt(&name), PendingAction::DeleteCollection(name));
            }
            KeyCode::Char('C') => {
                self.confirm(prompt::CLEAR_PROMPT.to_string(), PendingAction::ClearCollection)
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('?') => self.input_mode = InputMode::Help,
            _ => {}
        }
    }

    fn handle_title_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab => self.start_editing_citations(),
            KeyCode::Char(c) => {
                self.edit_buffer.push(c);
                self.write_title();
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
                self.write_title();
            }
            _ => {}
        }
    }

    fn handle_citations_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab => self.start_editing_title(),
            // Enter adds a fresh article and moves the cursor to its title
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let result = self.store.add_article_and_focus();
                self.apply(result);
            }
            KeyCode::Char(c) => {
                self.edit_buffer.push(c);
                self.write_citations();
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
                self.write_citations();
            }
            _ => {}
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.edit_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.edit_buffer);
                let mode = self.input_mode;
                self.input_mode = InputMode::Normal;

                let answered = Answered::yes();
                let result = if mode == InputMode::NamingCollection {
                    self.store.add_collection(Some(&name), &answered)
                } else {
                    let current = self.store.current().to_string();
                    // Enter on the untouched prefill is not a rename
                    if name.trim() == current {
                        return;
                    }
                    self.store.rename_collection(&current, &name, &answered)
                };
                self.apply(result);
                self.show_notices(&answered);
            }
            KeyCode::Char(c) => self.edit_buffer.push(c),
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let answer = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };

        self.input_mode = InputMode::Normal;
        let Some(action) = self.pending.take() else {
            return;
        };

        // The question was asked by the modal; replay it with the answer
        let answered = if answer { Answered::yes() } else { Answered::no() };
        let result = match &action {
            PendingAction::ClearCollection => self.store.clear_active_collection(&answered),
            PendingAction::DeleteCollection(name) => self.store.delete_collection(name, &answered),
        };
        self.apply(result);
    }

    fn confirm(&mut self, prompt: String, action: PendingAction) {
        self.confirm_prompt = prompt;
        self.pending = Some(action);
        self.input_mode = InputMode::Confirming;
    }

    /// Report a mutation result; failures become a notice
    fn apply(&mut self, result: hindex_core::Result<Outcome>) {
        match result {
            Ok(Outcome::Declined) => self.status_message = Some("Cancelled".to_string()),
            Ok(_) => {}
            Err(e) => {
                error!("Update failed: {}", e);
                self.show_notice(format!("Could not save changes: {}", e));
            }
        }
    }

    fn show_notices(&mut self, answered: &Answered) {
        if let Some(message) = answered.take_notices().pop() {
            self.show_notice(message);
        }
    }

    fn show_notice(&mut self, message: String) {
        self.notice = Some(message);
        self.input_mode = InputMode::Notice;
    }

    fn write_title(&mut self) {
        let result = self.store.edit_article_title(self.selected, &self.edit_buffer);
        self.apply(result);
    }

    fn write_citations(&mut self) {
        let result = self.store.edit_article_citations(self.selected, &self.edit_buffer);
        self.apply(result);
    }

    fn start_editing_title(&mut self) {
        if let Some(row) = self.view.rows.get(self.selected) {
            self.edit_buffer = row.title.clone();
            self.input_mode = InputMode::EditingTitle;
        }
    }

    fn start_editing_citations(&mut self) {
        if let Some(row) = self.view.rows.get(self.selected) {
            self.edit_buffer = row.citations.to_string();
            self.input_mode = InputMode::EditingCitations;
        }
    }

    fn cycle_collection(&mut self, step: isize) {
        let count = self.view.tabs.len() as isize;
        if count < 2 {
            return;
        }
        let next = (self.view.active_tab as isize + step).rem_euclid(count) as usize;
        let name = self.view.tabs[next].clone();
        let result = self.store.switch_collection(&name);
        self.apply(result);
    }

    fn export(&mut self) {
        let articles = self.store.articles();
        match Exporter::export_to_file(&articles, &self.export_file) {
            Ok(()) => {
                info!("Exported {} articles to {}", articles.len(), self.export_file.display());
                self.status_message = Some(format!(
                    "Exported {} to {}",
                    crate::view::plural(articles.len(), "article"),
                    self.export_file.display()
                ));
            }
            Err(e) => self.show_notice(format!("Export failed: {}", e)),
        }
    }

    pub fn next_row(&mut self) {
        if !self.view.rows.is_empty() && self.selected + 1 < self.view.rows.len() {
            self.select(self.selected + 1);
        }
    }

    pub fn previous_row(&mut self) {
        if self.selected > 0 {
            self.select(self.selected - 1);
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.view.rows.len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.table_state.select(Some(self.selected));
        }
    }
}
