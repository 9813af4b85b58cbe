//! Falling-block arena engine.
//!
//! - [`geometry`]: the seven piece shapes, quarter-turn rotation, seeded spawn shapes
//! - [`arena`]: occupancy grid where out-of-bounds reads as occupied, line clears, spawn placement
//! - [`game`]: active piece, command handling, and the render/poll/apply session loop
//! - [`input`]: commands and input sources (keyboard, numbered lines, scripts)
//! - [`render`]: renderer contract and the ASCII renderer
//!
//! ```
//! use arenatris::game::play;
//! use arenatris::geometry::PieceGenerator;
//! use arenatris::input::{Command, ScriptedInput};
//! use arenatris::render::FrameRecorder;
//!
//! let mut input = ScriptedInput::new([Command::HardDrop, Command::HardDrop]);
//! let mut frames = FrameRecorder::default();
//! let score = play(10, 20, PieceGenerator::seeded(7), &mut input, &mut frames).unwrap();
//! assert_eq!(score, 0);
//! ```

pub mod arena;
pub mod game;
pub mod geometry;
pub mod input;
pub mod render;

pub use arena::{Anchor, Arena, ArenaError};
pub use game::{Game, Outcome, Phase, SessionError, play};
pub use geometry::{PieceGenerator, PieceKind, Shape};
pub use input::{Command, InputSource};
pub use render::Renderer;
