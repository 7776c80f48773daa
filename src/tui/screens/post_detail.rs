//! Post detail screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::Post;
use crate::service::Route;
use crate::tui::action::Action;

/// State for the post detail screen.
#[derive(Debug, Clone, Default)]
pub struct PostDetailState {
    post: Option<Post>,
    /// Set after the first `d`; a second `d` deletes.
    confirm_delete: bool,
}

impl PostDetailState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `post`, cancelling any pending delete confirmation.
    pub fn set_post(&mut self, post: Post) {
        self.post = Some(post);
        self.confirm_delete = false;
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// Returns `true` while waiting for the delete confirmation.
    pub fn confirming_delete(&self) -> bool {
        self.confirm_delete
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let Some(post) = &self.post else {
            return Action::Navigate(Route::Home);
        };
        if key.code != KeyCode::Char('d') {
            self.confirm_delete = false;
        }
        match key.code {
            KeyCode::Char('e') => Action::Navigate(Route::UpdatePost(post.id.clone())),
            KeyCode::Char('d') if self.confirm_delete => {
                self.confirm_delete = false;
                Action::DeletePost(post.id.clone())
            }
            KeyCode::Char('d') => {
                self.confirm_delete = true;
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Esc => Action::Navigate(Route::Home),
            _ => Action::None,
        }
    }
}

/// Renders the post detail screen.
#[mutants::skip]
pub fn draw_post_detail(state: &PostDetailState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Post ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(post) = state.post() else {
        return;
    };

    let [body_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let label = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line> = post
        .caption
        .lines()
        .map(|l| Line::from(Span::styled(l, Style::default().add_modifier(Modifier::BOLD))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Location: ", label),
        Span::raw(post.location.as_str()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Tags:     ", label),
        Span::styled(
            post.tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" "),
            Style::default().fg(Color::Yellow),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Image:    ", label),
        Span::raw(post.image_url.as_deref().unwrap_or("none")),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Posted:   ", label),
        Span::raw(post.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
    ]));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        body_area,
    );

    let footer = if state.confirming_delete() {
        Paragraph::new("Press d again to delete this post")
            .style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new("e: edit  d: delete  q/Esc: back  F1: help")
            .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(footer, footer_area);
}
