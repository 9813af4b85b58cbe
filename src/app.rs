//! App: terminal init, one session, game-over screen. Plain-text mode for pipes.

use crate::Args;
use crate::theme::Theme;
use crate::ui::{TerminalRenderer, draw_game_over};
use arenatris::game::{Game, SessionError};
use arenatris::geometry::PieceGenerator;
use arenatris::input::{KeyboardInput, LineInput, command_legend};
use arenatris::render::TextRenderer;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::io::{self, Write};

/// Final numbers of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: u32,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
}

pub struct App {
    args: Args,
    theme: Theme,
}

impl App {
    pub fn new(args: Args, theme: Theme) -> Self {
        Self { args, theme }
    }

    fn pieces(&self) -> PieceGenerator {
        match self.args.seed {
            Some(seed) => {
                log::info!("piece seed {seed}");
                PieceGenerator::seeded(seed)
            }
            None => PieceGenerator::from_entropy(),
        }
    }

    fn new_game(&self) -> Result<Game> {
        Game::new(self.args.width, self.args.height, self.pieces()).with_context(|| {
            format!("cannot create a {}x{} arena", self.args.width, self.args.height)
        })
    }

    pub fn run(&mut self) -> Result<Summary> {
        if self.args.text {
            self.run_text()
        } else {
            self.run_terminal()
        }
    }

    /// Numbered commands on stdin, ASCII frames on stdout.
    fn run_text(&mut self) -> Result<Summary> {
        let mut game = self.new_game()?;
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", command_legend())?;
        let mut input = LineInput::new(stdin.lock(), io::stdout());
        let mut renderer = TextRenderer::new(stdout);
        game.run(&mut input, &mut renderer)?;
        Ok(summary(&game))
    }

    pub fn run_terminal(&mut self) -> Result<Summary> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        let mut game = self.new_game()?;
        with_restore(
            || {
                enable_raw_mode()?;
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen)?;
                DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            },
            |mut terminal| self.run_loop(&mut terminal, &mut game),
            || {
                execute!(io::stdout(), LeaveAlternateScreen)?;
                disable_raw_mode()
            },
        )?;
        Ok(summary(&game))
    }

    fn run_loop(&self, terminal: &mut DefaultTerminal, game: &mut Game) -> Result<()> {
        let mut input = KeyboardInput;
        {
            let mut renderer = TerminalRenderer::new(terminal, self.theme.clone());
            match game.run(&mut input, &mut renderer) {
                Ok(_) => {}
                Err(SessionError::Input(e)) => return Err(e).context("reading keyboard"),
                Err(e) => return Err(e.into()),
            }
        }
        terminal.draw(|f| {
            draw_game_over(
                f,
                &self.theme,
                game.score(),
                game.lines_cleared(),
                game.game_over_reason(),
                f.area(),
            );
        })?;
        wait_for_key()
    }
}

/// Run `session` on whatever `setup` built. `restore` runs even when setup fails halfway.
fn with_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    session: impl FnOnce(T) -> Result<()>,
    restore: impl FnOnce() -> io::Result<()>,
) -> Result<()> {
    let result = setup().context("terminal setup failed").and_then(session);
    restore().context("terminal restore failed")?;
    result
}

/// Block until any key press.
fn wait_for_key() -> Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

fn summary(game: &Game) -> Summary {
    Summary {
        score: game.score(),
        lines_cleared: game.lines_cleared(),
        pieces_locked: game.pieces_locked(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_setup_still_restores() {
        let ran = Cell::new(false);
        let restored = Cell::new(false);
        let result = with_restore(
            || Err::<(), _>(io::Error::other("no tty")),
            |()| {
                ran.set(true);
                Ok(())
            },
            || {
                restored.set(true);
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(!ran.get());
        assert!(restored.get());
    }

    #[test]
    fn session_error_surfaces_after_restore() {
        let restored = Cell::new(false);
        let result = with_restore(
            || Ok(3),
            |n| Err(anyhow::anyhow!("session {n} failed")),
            || {
                restored.set(true);
                Ok(())
            },
        );
        assert_eq!(result.unwrap_err().to_string(), "session 3 failed");
        assert!(restored.get());
    }
}
