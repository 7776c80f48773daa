//! Home screen: the post feed, newest first.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::model::Post;
use crate::service::Route;
use crate::tui::action::Action;

/// Caption characters shown per row before truncation.
const CAPTION_PREVIEW: usize = 40;

/// State for the home screen.
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    posts: Vec<Post>,
    /// Index of the highlighted post, or `None` if the feed is empty.
    selected: Option<usize>,
}

impl HomeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feed, keeping the selection in range.
    ///
    /// A grown feed selects the newest post, which sorts first.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        let grew = posts.len() > self.posts.len();
        self.selected = match (self.selected, posts.len()) {
            (_, 0) => None,
            (Some(_), _) if grew => Some(0),
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => Some(0),
        };
        self.posts = posts;
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.map(|i| i.saturating_sub(1));
                Action::None
            }
            KeyCode::Down => {
                self.selected = match self.selected {
                    Some(i) if i + 1 < self.posts.len() => Some(i + 1),
                    other => other,
                };
                Action::None
            }
            KeyCode::Enter => self.selected_route(Route::PostDetail),
            KeyCode::Char('e') => self.selected_route(Route::UpdatePost),
            KeyCode::Char('n') => Action::Navigate(Route::CreatePost),
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn selected_route(&self, to_route: fn(String) -> Route) -> Action {
        self.selected
            .and_then(|i| self.posts.get(i))
            .map_or(Action::None, |post| {
                Action::Navigate(to_route(post.id.clone()))
            })
    }
}

fn caption_preview(caption: &str) -> String {
    let first_line = caption.lines().next().unwrap_or("");
    if first_line.chars().count() > CAPTION_PREVIEW {
        let cut: String = first_line.chars().take(CAPTION_PREVIEW - 1).collect();
        format!("{cut}…")
    } else {
        first_line.to_string()
    }
}

/// Renders the home screen.
#[mutants::skip]
pub fn draw_home(state: &HomeState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Feed ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.posts().is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from("No posts yet."),
            Line::from("Press 'n' to create one."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let header = Row::new(vec!["Caption", "Location", "Tags", "Date"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = state.posts().iter().enumerate().map(|(i, post)| {
        let style = if Some(i) == state.selected() {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        Row::new(vec![
            caption_preview(&post.caption),
            post.location.clone(),
            post.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "),
            post.created_at.format("%Y-%m-%d").to_string(),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(45),
            Constraint::Percentage(20),
            Constraint::Percentage(23),
            Constraint::Length(10),
        ],
    )
    .header(header);
    frame.render_widget(table, table_area);

    let footer = Paragraph::new("↑/↓: select  Enter: open  n: new  e: edit  q: quit  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
