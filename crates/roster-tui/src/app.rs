use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
    image::decode_file, Country, FormController, FormError, Gender, Hobby, ImageAttachment,
    ImageError, ImageTicket, RecordStore, Route, Router,
};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::editor::{create_textarea, style_textarea, textarea_content};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Form,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VimMode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Username,
    Email,
    Gender,
    Hobbies,
    Country,
    Message,
    Image,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 8] = [
        FormField::Username,
        FormField::Email,
        FormField::Gender,
        FormField::Hobbies,
        FormField::Country,
        FormField::Message,
        FormField::Image,
        FormField::Submit,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn accepts_text(self) -> bool {
        matches!(
            self,
            FormField::Username | FormField::Email | FormField::Message | FormField::Image
        )
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    ImageDecoded {
        ticket: ImageTicket,
        result: Result<ImageAttachment, ImageError>,
    },
}

pub struct App {
    pub store: RecordStore,
    pub router: Router,
    pub vim_mode: VimMode,

    pub error_message: Option<String>,
    pub status_message: Option<String>,

    // List view
    pub selected_row: usize,
    pub goto_prompt: Option<String>,

    // Form view
    pub form: Option<FormController>,
    pub form_field: FormField,
    pub gender_cursor: usize,
    pub hobby_cursor: usize,
    pub image_path: String,
    pub message_editor: TextArea<'static>,
}

impl App {
    pub fn new(store: RecordStore, initial: Route) -> Self {
        let mut app = Self {
            store,
            router: Router::default(),
            vim_mode: VimMode::Normal,
            error_message: None,
            status_message: None,
            selected_row: 0,
            goto_prompt: None,
            form: None,
            form_field: FormField::Username,
            gender_cursor: 0,
            hobby_cursor: 0,
            image_path: String::new(),
            message_editor: create_textarea(""),
        };
        if initial != Route::List {
            app.open_route(initial);
        }
        app
    }

    pub fn view(&self) -> View {
        match self.router.current() {
            Route::List => View::List,
            Route::Create | Route::Edit(_) if self.form.is_some() => View::Form,
            Route::Create | Route::Edit(_) | Route::NotFound(_) => View::NotFound,
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn open_route(&mut self, route: Route) {
        self.router.navigate(route);
        self.sync_route();
    }

    fn go_back(&mut self) {
        self.router.back();
        self.sync_route();
    }

    /// Build whatever the current route needs. Edit routes whose record is gone
    /// turn into not-found without adding history.
    fn sync_route(&mut self) {
        self.vim_mode = VimMode::Normal;
        self.form = match self.router.current().clone() {
            Route::Create => Some(FormController::create()),
            Route::Edit(id) => match FormController::edit(&self.store, id) {
                Ok(form) => Some(form),
                Err(e) => {
                    tracing::info!(id = %id, error = %e, "edit route did not resolve");
                    let path = self.router.current().path();
                    self.router.replace(Route::NotFound(path));
                    None
                }
            },
            Route::List | Route::NotFound(_) => None,
        };
        self.load_form_widgets();
        self.clamp_selection();
    }

    fn load_form_widgets(&mut self) {
        self.form_field = FormField::Username;
        self.gender_cursor = 0;
        self.hobby_cursor = 0;
        self.image_path.clear();
        let message = self
            .form
            .as_ref()
            .map(|f| f.draft().message.clone())
            .unwrap_or_default();
        self.message_editor = create_textarea(&message);
        if let Some(gender) = self.form.as_ref().and_then(|f| f.draft().gender) {
            self.gender_cursor = Gender::ALL.iter().position(|g| *g == gender).unwrap_or(0);
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_row = self.selected_row.min(self.store.len().saturating_sub(1));
    }

    /// Handle key events, returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) -> Result<bool> {
        if self.error_message.is_some() && key.code != KeyCode::Esc {
            self.clear_error();
        }
        self.status_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.goto_prompt.is_some() {
            self.handle_goto_key(key);
            return Ok(false);
        }

        match self.view() {
            View::List => Ok(self.handle_list_key(key)),
            View::NotFound => Ok(self.handle_not_found_key(key)),
            View::Form => {
                self.handle_form_key(key, tx);
                Ok(false)
            }
        }
    }

    fn handle_goto_key(&mut self, key: KeyEvent) {
        let Some(ref mut input) = self.goto_prompt else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.goto_prompt = None,
            KeyCode::Enter => {
                let path = input.clone();
                self.goto_prompt = None;
                self.open_route(Route::parse(&path));
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_row < self.store.len().saturating_sub(1) {
                    self.selected_row += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Char('a') | KeyCode::Char('n') => self.open_route(Route::Create),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(record) = self.store.list().get(self.selected_row) {
                    let id = record.id;
                    self.open_route(Route::Edit(id));
                }
            }
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('g') => self.goto_prompt = Some(String::new()),
            _ => {}
        }
        false
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.store.list().get(self.selected_row).map(|r| r.id) else {
            return;
        };
        match self.store.remove(id) {
            Ok(removed) => {
                self.status_message = Some(format!("Deleted {}", removed.username));
            }
            Err(e) => self.set_error(e.to_string()),
        }
        self.clamp_selection();
    }

    fn handle_not_found_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => self.go_back(),
            KeyCode::Char('g') => self.goto_prompt = Some(String::new()),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        match self.vim_mode {
            VimMode::Insert => self.handle_form_insert_key(key, tx),
            VimMode::Normal => self.handle_form_normal_key(key, tx),
        }
    }

    fn handle_form_insert_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        match (self.form_field, key.code) {
            (_, KeyCode::Esc) => self.vim_mode = VimMode::Normal,
            (_, KeyCode::Tab) => {
                self.vim_mode = VimMode::Normal;
                self.focus(self.form_field.next());
            }
            (FormField::Message, _) => {
                self.message_editor.input(key);
                let message = textarea_content(&self.message_editor);
                self.update_form(|f| f.set_message(message));
            }
            (FormField::Image, KeyCode::Enter) => {
                self.vim_mode = VimMode::Normal;
                self.load_image(tx);
            }
            (_, KeyCode::Enter) => {
                self.vim_mode = VimMode::Normal;
                self.focus(self.form_field.next());
            }
            (field, KeyCode::Char(c)) => {
                self.edit_text(field, |s| s.push(c));
            }
            (field, KeyCode::Backspace) => {
                self.edit_text(field, |s| {
                    s.pop();
                });
            }
            _ => {}
        }
    }

    fn handle_form_normal_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.cancel_form(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.focus(self.form_field.next());
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.focus(self.form_field.prev());
            }
            KeyCode::Char('i') if self.form_field.accepts_text() => {
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Char('s') => self.submit_form(),
            KeyCode::Char('R') => self.reset_form(),
            KeyCode::Char('h') | KeyCode::Left => self.adjust_choice(false),
            KeyCode::Char('l') | KeyCode::Right => self.adjust_choice(true),
            KeyCode::Char(' ') => self.select_choice(),
            KeyCode::Enter => match self.form_field {
                FormField::Submit => self.submit_form(),
                FormField::Image if !self.image_path.trim().is_empty() => self.load_image(tx),
                FormField::Gender | FormField::Hobbies | FormField::Country => {
                    self.select_choice()
                }
                field if field.accepts_text() => self.vim_mode = VimMode::Insert,
                _ => {}
            },
            _ => {}
        }
    }

    fn focus(&mut self, field: FormField) {
        self.form_field = field;
        style_textarea(&mut self.message_editor, field == FormField::Message);
    }

    fn update_form(&mut self, apply: impl FnOnce(&mut FormController) -> Result<(), FormError>) {
        if let Some(ref mut form) = self.form {
            if let Err(e) = apply(form) {
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn edit_text(&mut self, field: FormField, apply: impl FnOnce(&mut String)) {
        let Some(ref form) = self.form else {
            return;
        };
        match field {
            FormField::Username => {
                let mut value = form.draft().username.clone();
                apply(&mut value);
                self.update_form(|f| f.set_username(value));
            }
            FormField::Email => {
                let mut value = form.draft().email.clone();
                apply(&mut value);
                self.update_form(|f| f.set_email(value));
            }
            FormField::Image => apply(&mut self.image_path),
            _ => {}
        }
    }

    fn adjust_choice(&mut self, forward: bool) {
        match self.form_field {
            FormField::Gender => {
                let len = Gender::ALL.len();
                self.gender_cursor = if forward {
                    (self.gender_cursor + 1) % len
                } else {
                    (self.gender_cursor + len - 1) % len
                };
                let gender = Gender::ALL[self.gender_cursor];
                self.update_form(|f| f.set_gender(Some(gender)));
            }
            FormField::Hobbies => {
                let len = Hobby::ALL.len();
                self.hobby_cursor = if forward {
                    (self.hobby_cursor + 1) % len
                } else {
                    (self.hobby_cursor + len - 1) % len
                };
            }
            FormField::Country => {
                let current = self.form.as_ref().and_then(|f| f.draft().country);
                let country = Country::cycle(current, forward);
                self.update_form(|f| f.set_country(Some(country)));
            }
            _ => {}
        }
    }

    fn select_choice(&mut self) {
        match self.form_field {
            FormField::Gender => {
                let gender = Gender::ALL[self.gender_cursor];
                self.update_form(|f| f.set_gender(Some(gender)));
            }
            FormField::Hobbies => {
                let hobby = Hobby::ALL[self.hobby_cursor];
                self.update_form(|f| f.toggle_hobby(hobby));
            }
            FormField::Country => self.adjust_choice(true),
            _ => {}
        }
    }

    fn resolve_image_path(&self) -> PathBuf {
        let raw = self.image_path.trim();
        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(raw)
    }

    /// Start decoding the typed file. The result comes back as `AppEvent::ImageDecoded`.
    fn load_image(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let path = self.resolve_image_path();
        if path.as_os_str().is_empty() {
            return;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let Some(ref mut form) = self.form else {
            return;
        };
        let ticket = match form.begin_image(file_name) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };

        tracing::debug!(path = %path.display(), ticket = ticket.0, "decoding image");
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = decode_file(&path).await;
            let _ = tx.send(AppEvent::ImageDecoded { ticket, result }).await;
        });
    }

    pub fn on_image_decoded(
        &mut self,
        ticket: ImageTicket,
        result: Result<ImageAttachment, ImageError>,
    ) {
        if let Some(ref mut form) = self.form {
            form.complete_image(ticket, result);
        }
    }

    fn submit_form(&mut self) {
        let Some(ref mut form) = self.form else {
            return;
        };
        match form.submit(&mut self.store) {
            Ok(commit) => {
                let name = self
                    .store
                    .get(commit.id)
                    .map(|r| r.username.clone())
                    .unwrap_or_default();
                self.status_message = Some(format!("Saved {}", name));
                self.router.apply(commit.navigation);
                self.sync_route();
                if let Some(idx) = self.store.position(commit.id) {
                    self.selected_row = idx;
                }
            }
            Err(FormError::Invalid(errors)) => {
                self.status_message = Some(format!("{} field(s) need attention", errors.count()));
            }
            Err(FormError::RecordNotFound(id)) => {
                tracing::info!(id = %id, "record vanished before update");
                let path = self.router.current().path();
                self.router.replace(Route::NotFound(path));
                self.form = None;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn reset_form(&mut self) {
        self.update_form(|f| f.reset());
        let field = self.form_field;
        self.load_form_widgets();
        self.focus(field);
    }

    fn cancel_form(&mut self) {
        let Some(ref mut form) = self.form else {
            return;
        };
        match form.cancel() {
            Ok(navigation) => {
                self.router.apply(navigation);
                self.sync_route();
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }
}
