//! Status bar widget: signed-in user on the left, transient toast on the right.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::service::Notifier;

/// State behind the status bar. Doubles as the app's [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    /// Display name of the active user.
    pub user: String,
    toast: Option<String>,
}

impl StatusLine {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            toast: None,
        }
    }

    /// The toast currently shown, if any.
    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    /// Shows `message` until the next key press.
    pub fn show(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    /// Hides the toast. Called on the next key press.
    pub fn dismiss(&mut self) {
        self.toast = None;
    }
}

impl Notifier for StatusLine {
    fn notify(&mut self, message: &str) {
        self.show(message);
    }
}

/// Renders the status bar on a single line.
#[mutants::skip]
pub fn draw_status_bar(status: &StatusLine, frame: &mut Frame, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Min(0)]).areas(area);

    let user = Paragraph::new(Line::from(Span::styled(
        format!("@{}", status.user),
        Style::default().fg(Color::Cyan),
    )));
    frame.render_widget(user, left);

    if let Some(toast) = status.toast() {
        let toast = Paragraph::new(Line::from(Span::styled(
            toast,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .right_aligned();
        frame.render_widget(toast, right);
    }
}
