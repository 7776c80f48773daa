//! Help screen: keybinding reference for the screen it was opened from.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::action::Action;
use crate::tui::app::Screen;

static HOME_KEYS: &[(&str, &str)] = &[
    ("↑/↓", "navigate"),
    ("Enter", "open post"),
    ("n", "new post"),
    ("e", "edit post"),
    ("q / Esc", "quit"),
    ("F1", "help"),
];

static DETAIL_KEYS: &[(&str, &str)] = &[
    ("e", "edit post"),
    ("d", "delete post"),
    ("q / Esc", "back to feed"),
    ("F1", "help"),
];

static FORM_KEYS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "next / prev field"),
    ("Enter", "submit"),
    ("Alt+Enter", "new line in caption"),
    ("Esc", "cancel"),
    ("F1", "help"),
];

static HELP_KEYS: &[(&str, &str)] = &[("↑/↓", "scroll"), ("q / Esc", "back")];

/// State for the help screen.
#[derive(Debug, Clone)]
pub struct HelpState {
    scroll: u16,
    origin: Screen,
}

impl Default for HelpState {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpState {
    /// Creates a help state scrolled to the top, opened from [`Screen::Home`].
    pub fn new() -> Self {
        Self {
            scroll: 0,
            origin: Screen::Home,
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Returns the screen that opened help.
    pub fn origin(&self) -> Screen {
        self.origin
    }

    /// Records the screen to return to and scrolls back to the top.
    pub fn open_from(&mut self, screen: Screen) {
        self.origin = screen;
        self.scroll = 0;
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Esc => Action::CloseHelp,
            _ => Action::None,
        }
    }
}

fn build_section(title: &'static str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);
    let dim_style = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, header_style)),
    ];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<20}"), key_style),
            Span::styled(*desc, dim_style),
        ]));
    }
    lines
}

fn help_content(origin: Screen) -> Vec<Line<'static>> {
    match origin {
        Screen::Home => build_section("Feed", HOME_KEYS),
        Screen::PostDetail => build_section("Post", DETAIL_KEYS),
        Screen::CreatePost | Screen::UpdatePost => build_section("Post Editor", FORM_KEYS),
        Screen::Help => build_section("Help", HELP_KEYS),
    }
}

/// Renders the help screen.
#[mutants::skip]
pub fn draw_help(state: &HelpState, frame: &mut Frame, area: Rect) {
    let title = format!(" Help: {} ", state.origin().label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [content_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let content_lines = help_content(state.origin());
    let total = content_lines.len() as u16;
    let capped_scroll = state.scroll().min(total.saturating_sub(content_area.height));

    let paragraph = Paragraph::new(content_lines).scroll((capped_scroll, 0));
    frame.render_widget(paragraph, content_area);

    let footer =
        Paragraph::new("↑/↓: scroll  q/Esc: back").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
