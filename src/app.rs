use crate::board::{Board, BoardAction};
use crate::form::{Form, FormOutcome};
use crate::model::Status;
use crate::ui::{render_to_string, RenderContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;
use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;

/// Input delivered by the terminal loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Resize { width: u16, height: u16 },
    Key(KeyEvent),
}

/// The sub-model that currently receives input.
#[derive(Debug, Clone)]
pub enum Active {
    Board,
    Form(Form),
}

/// Routes events to the board or to the task form and moves control and
/// created tasks between them.
#[derive(Debug, Clone)]
pub struct App {
    board: Board,
    active: Active,
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

impl App {
    pub fn new(board: Board) -> Self {
        App {
            board,
            active: Active::Board,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Active {
        &self.active
    }

    pub fn should_quit(&self) -> bool {
        self.board.is_quitting()
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Resize { width, height } => {
                // The board owns the panel layout even while hidden.
                self.board.handle_resize(width, height);
                if let Active::Form(form) = &mut self.active {
                    form.handle_resize(width, height);
                }
            }
            Event::Key(key) => match &mut self.active {
                Active::Board => {
                    let action = self.board.handle_key(key)?;
                    self.apply_board_action(action);
                }
                Active::Form(form) => {
                    let outcome = form.handle_key(key);
                    self.apply_form_outcome(outcome);
                }
            },
        }
        Ok(())
    }

    fn apply_board_action(&mut self, action: BoardAction) {
        match action {
            BoardAction::CreateTask(status) => self.open_form(status),
            BoardAction::Quit => info!("quit requested"),
            BoardAction::None => {}
        }
    }

    fn apply_form_outcome(&mut self, outcome: FormOutcome) {
        match outcome {
            FormOutcome::Pending => {}
            FormOutcome::Submitted(task) => {
                self.active = Active::Board;
                self.board.receive_created_task(task);
            }
            FormOutcome::Cancelled => {
                info!("task form cancelled");
                self.active = Active::Board;
            }
            FormOutcome::Quit => {
                info!("quit requested from task form");
                self.active = Active::Board;
                self.board.quit();
            }
        }
    }

    fn open_form(&mut self, status: Status) {
        info!("opening task form for {}", status.label());
        let mut form = Form::new(status);
        if let Some(layout) = self.board.layout() {
            form.handle_resize(layout.width, layout.height);
        }
        self.active = Active::Form(form);
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, ctx: &RenderContext<'_>) {
        match self.active() {
            Active::Board => self.board.render(area, buf, ctx),
            Active::Form(form) => form.render(area, buf, ctx),
        }
    }

    pub fn view(&self, ctx: &RenderContext<'_>) -> String {
        match (&self.active, self.board.layout()) {
            (Active::Form(form), Some(layout)) => {
                render_to_string(layout.width, layout.height, |area, buf| {
                    form.render(area, buf, ctx)
                })
            }
            _ => self.board.view(ctx),
        }
    }
}
