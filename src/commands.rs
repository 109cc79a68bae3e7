use crate::app::{App, Event};
use crate::board::Board;
use crate::config::Config;
use crate::model::Status;
use crate::ui::{self, RenderContext, Theme};
use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn tui(config: &Config, empty: bool) -> Result<()> {
    let mut app = App::new(build_board(config, empty));
    let theme = Theme::from(config.theme);
    let ctx = RenderContext {
        theme: &theme,
        show_help: config.show_help,
    };
    ui::run(&mut app, &ctx)
}

pub fn snapshot(config: &Config, width: u16, height: u16, focus: Status, empty: bool) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("snapshot size must be non-zero, got {}x{}", width, height);
    }
    let mut app = App::new(build_board(config, empty));
    app.handle_event(Event::Resize { width, height })?;
    while app.board().focused() != focus {
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)))?;
    }
    let theme = Theme::from(config.theme);
    let ctx = RenderContext {
        theme: &theme,
        show_help: config.show_help,
    };
    println!("{}", app.view(&ctx));
    Ok(())
}

fn build_board(config: &Config, empty: bool) -> Board {
    Board::new()
        .with_seed(config.seed && !empty)
        .with_move_policy(config.move_policy)
}
