use crate::app::is_interrupt;
use crate::model::{Status, Task};
use crate::ui::{help_line, RenderContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget, Wrap};
use std::mem;

const MIN_FORM_WIDTH: u16 = 40;

const FORM_HELP: &[(&str, &str)] = &[
    ("enter", "next/save"),
    ("esc", "cancel"),
    ("ctrl+c", "quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    EditingTitle,
    EditingDescription,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Pending,
    Submitted(Task),
    Cancelled,
    Quit,
}

/// A single text buffer with a byte cursor that always sits on a char
/// boundary.
#[derive(Debug, Clone)]
pub struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    pub fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Applies an editing key. Returns false when the key means nothing to a
    /// text field.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    return false;
                }
                self.insert_char(c);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => return false,
        }
        true
    }

    fn move_left(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    fn move_right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let end = self.cursor;
        self.move_left();
        self.value.drain(self.cursor..end);
    }

    fn delete(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            let end = self.cursor + ch.len_utf8();
            self.value.drain(self.cursor..end);
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert(self.cursor, '▌');
        text
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        mem::take(&mut self.value)
    }
}

/// Two-step capture of a new task's title and description.
#[derive(Debug, Clone)]
pub struct Form {
    target: Status,
    title: FieldValue,
    description: FieldValue,
    phase: Phase,
    width: Option<u16>,
}

impl Form {
    pub fn new(target: Status) -> Self {
        Form {
            target,
            title: FieldValue::new(""),
            description: FieldValue::new(""),
            phase: Phase::EditingTitle,
            width: None,
        }
    }

    pub fn target(&self) -> Status {
        self.target
    }

    pub fn title_focused(&self) -> bool {
        self.phase == Phase::EditingTitle
    }

    pub fn description_focused(&self) -> bool {
        self.phase == Phase::EditingDescription
    }

    pub fn title(&self) -> &str {
        self.title.value()
    }

    pub fn handle_resize(&mut self, width: u16, _height: u16) {
        self.width = Some((width / 2).max(MIN_FORM_WIDTH));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        if is_interrupt(&key) {
            return FormOutcome::Quit;
        }
        match (key.code, self.phase) {
            (_, Phase::Submitted) => return FormOutcome::Pending,
            (KeyCode::Esc, _) => return FormOutcome::Cancelled,
            (KeyCode::Enter, Phase::EditingTitle) => {
                self.phase = Phase::EditingDescription;
                debug!("form title captured, editing description");
                return FormOutcome::Pending;
            }
            (KeyCode::Enter, Phase::EditingDescription) => {
                self.phase = Phase::Submitted;
                debug!("form submitted '{}'", self.title());
                let task = Task::new(self.target, self.title.take(), self.description.take());
                return FormOutcome::Submitted(task);
            }
            _ => {}
        }
        if let Some(field) = self.focused_field_mut() {
            if !field.handle_key(key) {
                debug!("form ignored {:?}", key.code);
            }
        }
        FormOutcome::Pending
    }

    fn focused_field_mut(&mut self) -> Option<&mut FieldValue> {
        match self.phase {
            Phase::EditingTitle => Some(&mut self.title),
            Phase::EditingDescription => Some(&mut self.description),
            Phase::Submitted => None,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let help_height = if ctx.show_help { 1 } else { 0 };
        let width = self.width.unwrap_or(area.width).min(area.width);
        let area = Rect { width, ..area };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(help_height)])
            .split(area);

        let mut lines = field_lines("Title", &self.title, self.title_focused(), theme.muted);
        lines.push(Line::raw(""));
        lines.extend(field_lines(
            "Description",
            &self.description,
            self.description_focused(),
            theme.muted,
        ));

        let title = format!(" Create New Task · {} ", self.target().label());
        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(
                        title,
                        Style::default()
                            .fg(theme.focused_border)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.focused_border))
                    .padding(Padding::new(2, 2, 1, 1)),
            )
            .wrap(Wrap { trim: false });
        dialog.render(rows[0], buf);

        if ctx.show_help {
            Paragraph::new(help_line(FORM_HELP, theme)).render(rows[1], buf);
        }
    }
}

fn field_lines(label: &str, field: &FieldValue, active: bool, muted: Color) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(muted).add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let text = if active {
        field.with_caret()
    } else {
        field.value().to_string()
    };
    vec![
        Line::from(Span::styled(format!("{}:", label), label_style)),
        Line::from(Span::styled(text, value_style)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{render_to_string, Theme};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut Form, text: &str) {
        for ch in text.chars() {
            assert_eq!(form.handle_key(key(KeyCode::Char(ch))), FormOutcome::Pending);
        }
    }

    #[test]
    fn round_trip_produces_task_with_bound_status() {
        let mut form = Form::new(Status::InProgress);
        assert!(form.title_focused());
        assert!(!form.description_focused());

        type_text(&mut form, "x");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Pending);
        assert_eq!(form.phase, Phase::EditingDescription);
        assert!(!form.title_focused());
        assert!(form.description_focused());

        type_text(&mut form, "y");
        let outcome = form.handle_key(key(KeyCode::Enter));
        assert_eq!(
            outcome,
            FormOutcome::Submitted(Task::new(Status::InProgress, "x", "y"))
        );
        assert_eq!(form.phase, Phase::Submitted);
        assert!(!form.title_focused() && !form.description_focused());
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Pending);
    }

    #[test]
    fn q_is_ordinary_text() {
        let mut form = Form::new(Status::Todo);
        type_text(&mut form, "quiz");
        assert_eq!(form.title(), "quiz");
    }

    #[test]
    fn escape_cancels_and_ctrl_c_quits() {
        let mut form = Form::new(Status::Todo);
        type_text(&mut form, "half");
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Cancelled);

        let mut form = Form::new(Status::Done);
        form.handle_key(key(KeyCode::Enter));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key(ctrl_c), FormOutcome::Quit);
        assert_eq!(form.description.value(), "");
    }

    #[test]
    fn editing_keys_only_touch_focused_field() {
        let mut form = Form::new(Status::Todo);
        type_text(&mut form, "cafe");
        form.handle_key(key(KeyCode::Backspace));
        type_text(&mut form, "é!");
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Delete));
        assert_eq!(form.title(), "caf!");
        form.handle_key(key(KeyCode::Home));
        type_text(&mut form, ">");
        form.handle_key(key(KeyCode::End));
        type_text(&mut form, "<");
        assert_eq!(form.title(), ">caf!<");
        assert_eq!(form.description.value(), "");
    }

    #[test]
    fn field_reports_unhandled_keys() {
        let mut field = FieldValue::new("ab");
        assert!(!field.handle_key(key(KeyCode::Tab)));
        assert!(!field.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT)));
        assert!(field.handle_key(key(KeyCode::Backspace)));
        assert_eq!(field.value(), "a");
        field.handle_key(key(KeyCode::Home));
        assert!(field.handle_key(key(KeyCode::Backspace)));
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn render_shows_labels_and_caret() {
        let mut form = Form::new(Status::Done);
        type_text(&mut form, "buy gloves");
        let theme = Theme::default();
        let ctx = RenderContext {
            theme: &theme,
            show_help: true,
        };
        let text = render_to_string(60, 14, |area, buf| form.render(area, buf, &ctx));
        assert!(text.contains("Create New Task · Done"));
        assert!(text.contains("Title:"));
        assert!(text.contains("buy gloves▌"));
        assert!(text.contains("Description:"));
        assert!(text.contains("esc cancel"));
    }

    #[test]
    fn render_styles_border_and_labels() {
        let form = Form::new(Status::Todo);
        let theme = Theme::default();
        let ctx = RenderContext {
            theme: &theme,
            show_help: true,
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 14));
        form.render(buf.area, &mut buf, &ctx);

        let corner = buf.get(0, 0);
        assert_eq!(corner.symbol(), "╭");
        assert_eq!(corner.fg, theme.focused_border);
        let label = buf.get(3, 2);
        assert_eq!(label.symbol(), "T");
        assert_eq!(label.fg, theme.muted);
        // The focused title field shows only the caret, in the active color.
        let caret = buf.get(3, 3);
        assert_eq!(caret.symbol(), "▌");
        assert_eq!(caret.fg, Color::Cyan);
    }

    #[test]
    fn resize_limits_form_width() {
        let mut form = Form::new(Status::Todo);
        form.handle_resize(200, 50);
        let theme = Theme::default();
        let ctx = RenderContext {
            theme: &theme,
            show_help: false,
        };
        let text = render_to_string(200, 10, |area, buf| form.render(area, buf, &ctx));
        let first = text.lines().next().unwrap_or_default();
        assert_eq!(first.chars().count(), 100);
    }
}
