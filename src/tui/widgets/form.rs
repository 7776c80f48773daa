//! Text input form widget used by the post editor.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// A single field within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Title shown on the field border.
    pub label: String,
    /// Current text value.
    pub value: String,
    /// Hint rendered while the value is empty.
    pub placeholder: Option<String>,
    /// Validation error message, if any.
    pub error: Option<String>,
    /// Number of text lines the field shows; longer values wrap.
    pub lines: u16,
}

impl FormField {
    /// Creates a single-line field.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            placeholder: None,
            error: None,
            lines: 1,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Makes the field a wrapping text area showing `lines` lines.
    pub fn with_lines(mut self, lines: u16) -> Self {
        self.lines = lines.max(1);
        self
    }

    /// Rows taken on screen: text lines, two border rows and one error row.
    fn height(&self) -> u16 {
        self.lines + 3
    }
}

/// A multi-field text form with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to `index`; out-of-range indices are ignored.
    pub fn set_focus(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Inserts a character at the end of the focused field.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(ch);
        }
    }

    /// Deletes the last character from the focused field.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Replaces the value of the field at `index`.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    /// Sets or clears the error message of the field at `index`.
    pub fn set_error(&mut self, index: usize, error: Option<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = error;
        }
    }

    /// Returns `true` if any field has an error set.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    /// Returns the value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Total rows needed to draw every field.
    pub fn height(&self) -> u16 {
        self.fields.iter().map(FormField::height).sum()
    }
}

/// Renders a form within the given area.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|f| Constraint::Length(f.height()))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focus;

        let border_color = if field.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let [input_area, error_area] =
            Layout::vertical([Constraint::Length(field.lines + 2), Constraint::Length(1)])
                .areas(rows[i]);

        let block = Block::default()
            .title(field.label.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = match (&field.placeholder, field.value.is_empty()) {
            (Some(hint), true) if !is_focused => {
                vec![Span::styled(hint.as_str(), Style::default().fg(Color::DarkGray))]
            }
            _ => vec![Span::raw(field.value.as_str())],
        };
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, input_area);

        if let Some(ref err) = field.error {
            let error_line = Paragraph::new(Span::styled(
                format!("  {err}"),
                Style::default().fg(Color::Red),
            ));
            frame.render_widget(error_line, error_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_form() -> Form {
        Form::new(vec![
            FormField::new("Caption").with_lines(3),
            FormField::new("Location"),
            FormField::new("Tags").with_placeholder("Art, Expression, Learn"),
        ])
    }

    mod focus {
        use super::*;

        #[test]
        fn starts_at_zero() {
            assert_eq!(make_form().focus(), 0);
        }

        #[test]
        fn next_wraps() {
            let mut form = make_form();
            form.focus_next();
            assert_eq!(form.focus(), 1);
            form.focus_next();
            form.focus_next();
            assert_eq!(form.focus(), 0);
        }

        #[test]
        fn prev_wraps() {
            let mut form = make_form();
            form.focus_prev();
            assert_eq!(form.focus(), 2);
        }

        #[test]
        fn empty_form_is_noop() {
            let mut form = Form::new(vec![]);
            form.focus_next();
            form.focus_prev();
            assert_eq!(form.focus(), 0);
        }

        #[test]
        fn set_focus_ignores_out_of_range() {
            let mut form = make_form();
            form.set_focus(2);
            assert_eq!(form.focus(), 2);
            form.set_focus(9);
            assert_eq!(form.focus(), 2);
        }
    }

    mod editing {
        use super::*;

        #[test]
        fn insert_and_delete_on_focused_field() {
            let mut form = make_form();
            form.focus_next();
            form.insert_char('P');
            form.insert_char('x');
            form.delete_char();
            assert_eq!(form.value(0), "");
            assert_eq!(form.value(1), "P");
        }

        #[test]
        fn delete_on_empty_is_noop() {
            let mut form = make_form();
            form.delete_char();
            assert_eq!(form.value(0), "");
        }

        #[test]
        fn set_value_replaces_text() {
            let mut form = make_form();
            form.set_value(2, "a,b");
            assert_eq!(form.value(2), "a,b");
        }

        #[test]
        fn value_out_of_bounds_returns_empty() {
            assert_eq!(make_form().value(99), "");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn set_and_clear_error() {
            let mut form = make_form();
            form.set_error(0, Some("Minimum 5 characters.".into()));
            assert!(form.has_errors());
            form.set_error(0, None);
            assert!(!form.has_errors());
        }

        #[test]
        fn error_out_of_bounds_is_noop() {
            let mut form = make_form();
            form.set_error(99, Some("nope".into()));
            assert!(!form.has_errors());
        }
    }

    #[test]
    fn height_counts_lines_borders_and_error_rows() {
        // Caption: 3 + 3, Location: 1 + 3, Tags: 1 + 3.
        assert_eq!(make_form().height(), 14);
    }

    #[test]
    fn with_lines_has_minimum_of_one() {
        assert_eq!(FormField::new("x").with_lines(0).lines, 1);
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn render(form: &Form) -> String {
            let backend = TestBackend::new(50, form.height());
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| draw_form(form, frame, frame.area()))
                .unwrap();
            let buf = terminal.backend().buffer();
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[test]
        fn shows_labels_and_placeholder() {
            let output = render(&make_form());
            assert!(output.contains("Caption"));
            assert!(output.contains("Location"));
            assert!(output.contains("Art, Expression"), "{output}");
        }

        #[test]
        fn shows_error_text() {
            let mut form = make_form();
            form.set_error(1, Some("This field is required".into()));
            let output = render(&form);
            assert!(output.contains("This field is required"), "{output}");
        }
    }
}
