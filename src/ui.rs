use crate::app::{App, Event};
use crate::config::ThemeConfig;
use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::prelude::{Color, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::Duration;

/// Colors used by every render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub focused_border: Color,
    pub muted: Color,
    pub help: Color,
}

impl From<ThemeConfig> for Theme {
    fn from(config: ThemeConfig) -> Self {
        Theme {
            focused_border: Color::Indexed(config.focused_border),
            muted: Color::Indexed(config.muted),
            help: Color::Indexed(config.help),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        ThemeConfig::default().into()
    }
}

/// Presentation settings handed to `render` explicitly instead of living in
/// shared mutable styles.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub show_help: bool,
}

pub fn run(app: &mut App, ctx: &RenderContext<'_>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(app, ctx, &mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

fn event_loop(
    app: &mut App,
    ctx: &RenderContext<'_>,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<()> {
    // crossterm only reports changes, so the first size is read directly.
    let size = terminal.size()?;
    app.handle_event(Event::Resize {
        width: size.width,
        height: size.height,
    })?;
    loop {
        terminal.draw(|f| {
            let area = f.size();
            app.render(area, f.buffer_mut(), ctx);
        })?;
        // The frame drawn after quitting is blank, which leaves a clean screen.
        if app.should_quit() {
            break;
        }
        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_event(Event::Key(key))?;
                }
                TermEvent::Resize(width, height) => {
                    app.handle_event(Event::Resize { width, height })?;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Renders into an off-screen buffer of the given size and returns its text.
pub fn render_to_string(width: u16, height: u16, render: impl FnOnce(Rect, &mut Buffer)) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    render(area, &mut buf);
    buffer_to_string(&buf)
}

/// Buffer rows joined by newlines, with trailing blanks trimmed.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let width = buf.area.width.max(1) as usize;
    let mut lines: Vec<String> = buf
        .content()
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

pub fn help_line(entries: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let key_style = Style::default().fg(theme.help);
    let text_style = Style::default().fg(theme.muted);
    let mut spans = Vec::new();
    for (idx, (key, action)) in entries.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" • ", text_style));
        }
        spans.push(Span::styled(key.to_string(), key_style));
        spans.push(Span::styled(format!(" {}", action), text_style));
    }
    Line::from(spans)
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    // Too narrow for an ellipsis to leave any text.
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
