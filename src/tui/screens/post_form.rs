//! Post editor screen, used for both creating and updating posts.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::form::{FormAction, PostForm, SubmitMode};
use crate::model::{Attachment, Field, Post};
use crate::service::Route;
use crate::tui::action::Action;
use crate::tui::widgets::form::{Form, FormField, draw_form};

/// Field index for the caption.
const CAPTION: usize = 0;
/// Field index for the image path.
const IMAGE: usize = 1;
/// Field index for the location.
const LOCATION: usize = 2;
/// Field index for the comma-separated tags.
const TAGS: usize = 3;

fn field_at(index: usize) -> Option<Field> {
    match index {
        CAPTION => Some(Field::Caption),
        IMAGE => Some(Field::File),
        LOCATION => Some(Field::Location),
        TAGS => Some(Field::Tags),
        _ => None,
    }
}

fn index_of(field: Field) -> usize {
    match field {
        Field::Caption => CAPTION,
        Field::File => IMAGE,
        Field::Location => LOCATION,
        Field::Tags => TAGS,
    }
}

/// State for the post editor.
///
/// The text widget mirrors the [`PostForm`], which owns the values and the
/// validation errors. The image field holds a file path that is read into an
/// [`Attachment`] on submit.
#[derive(Debug, Clone)]
pub struct PostFormState {
    form: Form,
    post_form: PostForm,
    cancel_route: Route,
}

impl PostFormState {
    /// Opens the editor, seeded from `existing` when editing.
    pub fn new(existing: Option<&Post>, action: FormAction) -> Self {
        let post_form = PostForm::new(existing, action);
        let mut form = Form::new(vec![
            FormField::new("Caption").with_lines(4),
            FormField::new("Add Photo").with_placeholder("path to a .png, .jpg or .svg file"),
            FormField::new("Add Location"),
            FormField::new("Add Tags (separated by comma \" , \")")
                .with_placeholder("Expression, Scenery, Enlightenment"),
        ]);
        let values = post_form.values();
        form.set_value(CAPTION, values.caption.as_str());
        form.set_value(LOCATION, values.location.as_str());
        form.set_value(TAGS, values.tags.as_str());

        let cancel_route = match post_form.mode() {
            SubmitMode::Update { post_id, .. } => Route::PostDetail(post_id.clone()),
            SubmitMode::Create => Route::Home,
        };

        Self {
            form,
            post_form,
            cancel_route,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    ///
    /// Submitting is ignored while `busy`.
    pub fn handle_key(&mut self, key: KeyEvent, busy: bool) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.form.focus_prev();
                Action::None
            }
            KeyCode::Enter
                if key.modifiers.contains(KeyModifiers::ALT) && self.form.focus() == CAPTION =>
            {
                self.form.insert_char('\n');
                self.sync_focused();
                Action::None
            }
            KeyCode::Enter if busy => Action::None,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.form.delete_char();
                self.sync_focused();
                Action::None
            }
            KeyCode::Char(ch) => {
                self.form.insert_char(ch);
                self.sync_focused();
                Action::None
            }
            KeyCode::Esc => Action::Navigate(self.cancel_route.clone()),
            _ => Action::None,
        }
    }

    /// Returns the text widget for rendering.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the underlying form controller.
    pub fn post_form(&self) -> &PostForm {
        &self.post_form
    }

    /// Label of the submit control.
    pub fn submit_label(&self, busy: bool) -> String {
        match (self.post_form.action(), busy) {
            (FormAction::Create, true) => "Creating...".to_string(),
            (FormAction::Update, true) => "Updating...".to_string(),
            (action, false) => format!("{} Post", action.label()),
        }
    }

    /// Pushes the focused text field into the controller and shows its
    /// validation result.
    fn sync_focused(&mut self) {
        let index = self.form.focus();
        match field_at(index) {
            Some(Field::File) => self.form.set_error(index, None),
            Some(field) => {
                self.post_form.set_text(field, self.form.value(index));
                self.form
                    .set_error(index, self.post_form.error(field).map(ToString::to_string));
            }
            None => {}
        }
    }

    fn sync_errors(&mut self) {
        for &field in Field::all() {
            self.form.set_error(
                index_of(field),
                self.post_form.error(field).map(ToString::to_string),
            );
        }
    }

    /// Reads the image path, validates everything and yields a submission.
    fn submit(&mut self) -> Action {
        let path = self.form.value(IMAGE).trim().to_string();
        let read_error = if path.is_empty() {
            self.post_form.set_file(Vec::new());
            None
        } else {
            match Attachment::from_path(Path::new(&path)) {
                Ok(attachment) => {
                    self.post_form.set_file(vec![attachment]);
                    None
                }
                Err(e) => Some(format!("could not read image: {e}")),
            }
        };

        let result = self.post_form.submit();
        if let Some(msg) = &read_error {
            self.post_form.set_error(Field::File, msg.as_str());
        }
        self.sync_errors();

        match result {
            Ok(submission) if read_error.is_none() => Action::Submit(submission),
            _ => {
                if let Some(field) = self.post_form.errors().fields().next() {
                    self.form.set_focus(index_of(field));
                }
                Action::None
            }
        }
    }
}

/// Renders the post editor.
#[mutants::skip]
pub fn draw_post_form(state: &PostFormState, busy: bool, frame: &mut Frame, area: Rect) {
    let title = match state.post_form().action() {
        FormAction::Create => " Create Post ",
        FormAction::Update => " Edit Post ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, preview_area, button_area, _spacer, footer_area] = Layout::vertical([
        Constraint::Length(state.form().height()),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    draw_form(state.form(), frame, form_area);

    if let Some(url) = state.post_form().preview_url() {
        let preview = Paragraph::new(Line::from(vec![
            Span::styled("Current photo: ", Style::default().fg(Color::DarkGray)),
            Span::raw(url),
        ]));
        frame.render_widget(preview, preview_area);
    }

    let button_style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", state.submit_label(busy)),
        button_style,
    )))
    .right_aligned();
    frame.render_widget(button, button_area);

    if state.form().has_errors() {
        let hint = Paragraph::new("Fix the fields marked in red")
            .style(Style::default().fg(Color::Red));
        frame.render_widget(hint, button_area);
    }

    let footer = Paragraph::new(
        "Tab/Shift+Tab: next/prev  Enter: submit  Alt+Enter: new line  Esc: cancel  F1: help",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
