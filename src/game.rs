//! Game state: arena, active piece, score, and the session loop driving them.

use crate::arena::{Anchor, Arena, ArenaError, LineClear};
use crate::geometry::{PieceGenerator, Rotation, Shape, rotate};
use crate::input::{Command, InputSource};
use crate::render::Renderer;
use rand::Rng;
use std::io;
use thiserror::Error;

/// Falling piece: oriented offsets plus absolute anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub shape: Shape,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the next piece to be generated and placed.
    Spawning,
    /// A piece is under player control.
    Falling,
    GameOver,
}

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// A new piece overlapped the stack at its spawn position.
    Blocked,
    Quit,
}

/// What one command did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    Rotated,
    /// Collision; nothing changed.
    Ignored,
    /// Piece landed; `lines` rows were cleared.
    Locked { lines: u32 },
    Ended(GameOverReason),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Arena(#[from] ArenaError),
    #[error("input source failed: {0}")]
    Input(#[source] io::Error),
    #[error("renderer failed: {0}")]
    Render(#[source] io::Error),
}

/// One play session: the arena owns the landed blocks, the game owns the falling piece.
#[derive(Debug)]
pub struct Game<R = rand::rngs::StdRng> {
    arena: Arena,
    piece: Option<ActivePiece>,
    pieces: PieceGenerator<R>,
    score: u32,
    lines_cleared: u32,
    pieces_locked: u32,
    phase: Phase,
    game_over_reason: Option<GameOverReason>,
}

impl<R: Rng> Game<R> {
    pub fn new(width: i32, height: i32, pieces: PieceGenerator<R>) -> Result<Self, ArenaError> {
        Ok(Self::with_arena(Arena::new(width, height)?, pieces))
    }

    /// Start from a prepared arena (e.g. a partially filled stack).
    pub fn with_arena(arena: Arena, pieces: PieceGenerator<R>) -> Self {
        Self {
            arena,
            piece: None,
            pieces,
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            phase: Phase::Spawning,
            game_over_reason: None,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Generate the next piece and place it at the spawn position.
    ///
    /// Returns false (and ends the game) when it does not fit.
    pub fn spawn(&mut self) -> bool {
        if self.phase != Phase::Spawning {
            return self.phase == Phase::Falling;
        }
        let shape = self.pieces.next_shape();
        self.spawn_shape(shape)
    }

    /// Place a specific shape as the new active piece.
    pub fn spawn_shape(&mut self, shape: Shape) -> bool {
        let anchor = self.arena.spawn_position(&shape);
        if !self.arena.can_place(anchor, &shape, 0, 0) {
            log::info!("spawn blocked at ({}, {}); game over with score {}", anchor.x, anchor.y, self.score);
            self.piece = None;
            self.end(GameOverReason::Blocked);
            return false;
        }
        log::debug!("spawned {:?} at ({}, {})", shape, anchor.x, anchor.y);
        self.piece = Some(ActivePiece { shape, anchor });
        self.phase = Phase::Falling;
        true
    }

    fn end(&mut self, reason: GameOverReason) {
        self.phase = Phase::GameOver;
        self.game_over_reason = Some(reason);
    }

    /// Apply one command to the falling piece. Blocked moves are no-ops.
    pub fn apply(&mut self, command: Command) -> Outcome {
        if let Some(reason) = self.game_over_reason {
            return Outcome::Ended(reason);
        }
        let Some(piece) = self.piece else {
            return Outcome::Ignored;
        };
        match command {
            Command::ShiftLeft => self.shift(piece, -1, 0),
            Command::ShiftRight => self.shift(piece, 1, 0),
            Command::RotateCw => self.rotate(piece, Rotation::Cw),
            Command::RotateCcw => self.rotate(piece, Rotation::Ccw),
            Command::SoftDrop => {
                // Down against the stack locks the piece like a hard drop.
                if self.arena.can_place(piece.anchor, &piece.shape, 0, 1) {
                    self.shift(piece, 0, 1)
                } else {
                    self.hard_drop(piece)
                }
            }
            Command::HardDrop => self.hard_drop(piece),
            Command::Quit => {
                self.arena.commit(piece.anchor, &piece.shape, true);
                self.piece = None;
                log::info!("quit with score {}", self.score);
                self.end(GameOverReason::Quit);
                Outcome::Ended(GameOverReason::Quit)
            }
        }
    }

    fn shift(&mut self, piece: ActivePiece, dx: i32, dy: i32) -> Outcome {
        if !self.arena.can_place(piece.anchor, &piece.shape, dx, dy) {
            return Outcome::Ignored;
        }
        self.piece = Some(ActivePiece {
            anchor: Anchor::new(piece.anchor.x + dx, piece.anchor.y + dy),
            ..piece
        });
        Outcome::Moved
    }

    fn rotate(&mut self, piece: ActivePiece, rotation: Rotation) -> Outcome {
        let shape = rotate(&piece.shape, rotation);
        if !self.arena.can_place(piece.anchor, &shape, 0, 0) {
            return Outcome::Ignored;
        }
        self.piece = Some(ActivePiece { shape, ..piece });
        Outcome::Rotated
    }

    /// Drop until blocked, lock, clear lines, spawn the next piece.
    fn hard_drop(&mut self, piece: ActivePiece) -> Outcome {
        let mut anchor = piece.anchor;
        while self.arena.can_place(anchor, &piece.shape, 0, 1) {
            anchor.y += 1;
        }
        self.arena.commit(anchor, &piece.shape, true);
        self.piece = None;
        self.pieces_locked += 1;

        let LineClear { lines, score } = self.arena.clear_lines(self.score);
        if lines > 0 {
            log::debug!("cleared {} line(s), score {} -> {}", lines, self.score, score);
        }
        self.score = score;
        self.lines_cleared += lines;

        self.phase = Phase::Spawning;
        if !self.spawn() {
            return Outcome::Ended(GameOverReason::Blocked);
        }
        Outcome::Locked { lines }
    }

    /// Stamp the falling piece, hand the grid to `draw`, then erase it again.
    pub fn with_piece_drawn<T>(&mut self, draw: impl FnOnce(&Arena, u32) -> T) -> T {
        let piece = self.piece;
        if let Some(p) = piece {
            self.arena.commit(p.anchor, &p.shape, true);
        }
        let result = draw(&self.arena, self.score);
        if let Some(p) = piece {
            self.arena.commit(p.anchor, &p.shape, false);
        }
        result
    }

    pub fn render(&mut self, renderer: &mut impl Renderer) -> io::Result<()> {
        self.with_piece_drawn(|arena, score| renderer.draw(arena.rows(), score))
    }

    /// Spawn, then render/poll/apply until the game ends. Draws a final frame.
    pub fn run(
        &mut self,
        input: &mut impl InputSource,
        renderer: &mut impl Renderer,
    ) -> Result<u32, SessionError> {
        self.spawn();
        while self.phase == Phase::Falling {
            self.render(renderer).map_err(SessionError::Render)?;
            let command = input.next_command().map_err(SessionError::Input)?;
            self.apply(command);
        }
        self.render(renderer).map_err(SessionError::Render)?;
        Ok(self.score)
    }
}

/// Play one session on a fresh `width` x `height` arena and return the final score.
pub fn play<R: Rng>(
    width: i32,
    height: i32,
    pieces: PieceGenerator<R>,
    input: &mut impl InputSource,
    renderer: &mut impl Renderer,
) -> Result<u32, SessionError> {
    let mut game = Game::new(width, height, pieces)?;
    game.run(input, renderer)
}
