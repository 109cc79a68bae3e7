use crate::app::is_interrupt;
use crate::model::{BoardError, Column, Status, Task};
use crate::ui::{help_line, render_to_string, truncate_text, RenderContext, Theme};
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info, warn};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph, StatefulWidget,
    Widget,
};
use serde::Deserialize;

/// Each panel's content width is this fraction of the terminal width.
const PANEL_DIVISOR: u16 = 4;
/// Border plus horizontal padding around a panel's content.
const PANEL_CHROME_WIDTH: u16 = 6;
/// Rows of the terminal left below the panels.
const PANEL_MARGIN_HEIGHT: u16 = 4;

const BOARD_HELP: &[(&str, &str)] = &[
    ("←/h →/l", "column"),
    ("↑/k ↓/j", "task"),
    ("enter", "advance"),
    ("n", "new"),
    ("q", "quit"),
];

/// Decides where "move forward" sends a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovePolicy {
    /// Done tasks wrap around to To Do.
    #[default]
    Wrap,
    /// Done is terminal; moving a Done task does nothing.
    StopAtDone,
}

impl MovePolicy {
    pub fn destination(self, from: Status) -> Option<Status> {
        match (self, from) {
            (MovePolicy::StopAtDone, Status::Done) => None,
            _ => Some(from.next()),
        }
    }
}

/// What the router should do after the board handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    None,
    CreateTask(Status),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub width: u16,
    pub height: u16,
}

impl PanelLayout {
    pub fn panel_width(&self) -> u16 {
        self.width / PANEL_DIVISOR
    }

    pub fn panel_height(&self) -> u16 {
        self.height.saturating_sub(PANEL_MARGIN_HEIGHT)
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    columns: [Column; 3],
    focused: Status,
    layout: Option<PanelLayout>,
    seed: bool,
    move_policy: MovePolicy,
    quitting: bool,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            columns: Status::ALL.map(Column::new),
            focused: Status::Todo,
            layout: None,
            seed: true,
            move_policy: MovePolicy::default(),
            quitting: false,
        }
    }

    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_move_policy(mut self, policy: MovePolicy) -> Self {
        self.move_policy = policy;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn focused(&self) -> Status {
        self.focused
    }

    pub fn layout(&self) -> Option<PanelLayout> {
        self.layout
    }

    pub fn column(&self, status: Status) -> &Column {
        &self.columns[status.index()]
    }

    fn column_mut(&mut self, status: Status) -> &mut Column {
        &mut self.columns[status.index()]
    }

    /// Builds and seeds the columns. Runs once; later calls only record the
    /// new size so a resize never discards tasks.
    pub fn initialize(&mut self, width: u16, height: u16) {
        let layout = PanelLayout { width, height };
        if self.is_loaded() {
            self.layout = Some(layout);
            return;
        }
        self.columns = Status::ALL.map(Column::new);
        if self.seed {
            for status in Status::ALL {
                self.column_mut(status).set_items(seed_tasks(status));
            }
        }
        self.layout = Some(layout);
        info!(
            "board loaded at {}x{} (panel width {}), seeded: {}",
            width,
            height,
            layout.panel_width(),
            self.seed
        );
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        if self.is_loaded() {
            debug!("resize to {}x{}", width, height);
        }
        self.initialize(width, height);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<BoardAction, BoardError> {
        if is_interrupt(&key) || key.code == KeyCode::Char('q') {
            self.quit();
            return Ok(BoardAction::Quit);
        }
        if !self.is_loaded() {
            debug!("ignoring {:?} before the board is loaded", key.code);
            return Ok(BoardAction::None);
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.focus_prev(),
            KeyCode::Right | KeyCode::Char('l') => self.focus_next(),
            KeyCode::Up | KeyCode::Char('k') => self.column_mut(self.focused).select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.column_mut(self.focused).select_next(),
            KeyCode::Enter => {
                self.move_selected_forward()?;
            }
            KeyCode::Char('n') => return Ok(self.enter_create_mode()),
            KeyCode::Char('d') => debug!(
                "delete is not supported (selected: {:?})",
                self.column(self.focused).selected().map(Task::title)
            ),
            _ => {}
        }
        Ok(BoardAction::None)
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
        debug!("focus {}", self.focused.label());
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
        debug!("focus {}", self.focused.label());
    }

    /// Moves the focused column's selected task to the end of the column for
    /// its next status. Returns the destination, or `None` when nothing moved.
    pub fn move_selected_forward(&mut self) -> Result<Option<Status>, BoardError> {
        let from = self.focused;
        let Some(index) = self.column(from).selected_index() else {
            return Ok(None);
        };
        let Some(dest) = self.move_policy.destination(from) else {
            debug!("{} is terminal under {:?}", from.label(), self.move_policy);
            return Ok(None);
        };
        let mut task = self.column_mut(from).remove_at(index).map_err(|err| {
            warn!("selected index {} vanished from {}: {}", index, from.label(), err);
            err
        })?;
        task.advance_status();
        debug_assert_eq!(task.status(), dest);
        info!(
            "moved '{}' from {} to {}",
            task.title(),
            from.label(),
            task.status().label()
        );
        self.column_mut(task.status()).append(task);
        Ok(Some(dest))
    }

    pub fn enter_create_mode(&self) -> BoardAction {
        BoardAction::CreateTask(self.focused)
    }

    pub fn receive_created_task(&mut self, task: Task) {
        info!("added '{}' to {}", task.title(), task.status().label());
        self.column_mut(task.status()).append(task);
    }

    pub fn quit(&mut self) {
        self.quitting = true;
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, ctx: &RenderContext<'_>) {
        if self.quitting {
            return;
        }
        let Some(layout) = self.layout else {
            Paragraph::new("Loading...").render(area, buf);
            return;
        };

        let help_height = if ctx.show_help { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(help_height)])
            .split(area);

        let panel_width = layout.panel_width() + PANEL_CHROME_WIDTH;
        let panels = Rect {
            height: layout.panel_height().min(rows[0].height),
            ..rows[0]
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(panel_width),
                Constraint::Length(panel_width),
                Constraint::Length(panel_width),
                Constraint::Min(0),
            ])
            .split(panels);

        for status in Status::ALL {
            render_column(
                self.column(status),
                status == self.focused,
                chunks[status.index()],
                buf,
                ctx.theme,
            );
        }

        if ctx.show_help {
            Paragraph::new(help_line(BOARD_HELP, ctx.theme)).render(rows[1], buf);
        }
    }

    /// Text of one frame at the last reported terminal size.
    pub fn view(&self, ctx: &RenderContext<'_>) -> String {
        if self.quitting {
            return String::new();
        }
        match self.layout {
            Some(layout) => render_to_string(layout.width, layout.height, |area, buf| {
                self.render(area, buf, ctx)
            }),
            None => "Loading...".to_string(),
        }
    }
}

fn render_column(column: &Column, focused: bool, area: Rect, buf: &mut Buffer, theme: &Theme) {
    // The unfocused panel pads by the border width so content lines up.
    let block = if focused {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.focused_border))
            .padding(Padding::new(2, 2, 1, 1))
    } else {
        Block::default().padding(Padding::new(3, 3, 2, 2))
    };
    let inner = block.inner(area);
    block.render(area, buf);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let title_style = if focused {
        Style::default()
            .fg(Color::White)
            .bg(theme.focused_border)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted).add_modifier(Modifier::BOLD)
    };
    Paragraph::new(Line::from(Span::styled(
        format!(" {} ", column.title()),
        title_style,
    )))
    .render(parts[0], buf);

    if column.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "No items.",
            Style::default().fg(theme.muted),
        )))
        .render(parts[1], buf);
        return;
    }

    let width = parts[1].width.saturating_sub(2) as usize;
    let items = column
        .items()
        .iter()
        .map(|task| task_item(task, width, focused, theme))
        .collect::<Vec<_>>();
    let highlight = if focused {
        Style::default()
            .fg(theme.focused_border)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .highlight_style(highlight)
        .highlight_symbol("│ ");
    let mut state = ListState::default();
    state.select(column.selected_index());
    StatefulWidget::render(list, parts[1], buf, &mut state);
}

fn task_item(task: &Task, width: usize, focused: bool, theme: &Theme) -> ListItem<'static> {
    let title_style = if focused {
        Style::default()
    } else {
        Style::default().fg(theme.muted)
    };
    let lines = vec![
        Line::from(Span::styled(truncate_text(task.title(), width), title_style)),
        Line::from(Span::styled(
            truncate_text(task.description(), width),
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
        )),
        Line::raw(""),
    ];
    ListItem::new(lines)
}

fn seed_tasks(status: Status) -> Vec<Task> {
    let raw: &[(&str, &str)] = match status {
        Status::Todo => &[
            ("get milk", "get milk from the grocery store"),
            ("clean room", "tidy up bedroom on the second floor"),
            ("lunch with friend", "get lunch with john doe at 3pm"),
        ],
        Status::InProgress => &[
            ("walk dog", "walk the dog at 8:30pm"),
            ("interview", "interview the cat at 10:00pm"),
        ],
        Status::Done => &[
            ("buy groceries", "buy groceries at the grocery store"),
            ("buy new gloves", "buy new gloves for winter"),
        ],
    };
    raw.iter()
        .map(|(title, description)| Task::new(status, *title, *description))
        .collect()
}
