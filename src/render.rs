//! Renderer contract and the plain-text renderer.

use std::io::{self, Write};

const WALL: &str = "##";
const SQUARE: &str = "[]";
const EMPTY: &str = "  ";

/// Receives the grid (rows of occupancy, top first) and score once per frame.
pub trait Renderer {
    fn draw(&mut self, rows: &[Vec<bool>], score: u32) -> io::Result<()>;
}

/// Walls of `##`, blocks as `[]`, then a score line under the floor.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// The whole frame as a string, one line per row plus the floor and score.
pub fn frame_text(rows: &[Vec<bool>], score: u32) -> String {
    let width = rows.first().map_or(0, Vec::len);
    let mut text = String::with_capacity((rows.len() + 2) * (width + 3) * 2);
    for row in rows {
        text.push_str(WALL);
        for &occupied in row {
            text.push_str(if occupied { SQUARE } else { EMPTY });
        }
        text.push_str(WALL);
        text.push('\n');
    }
    for _ in 0..width + 2 {
        text.push_str(WALL);
    }
    text.push('\n');
    // Score sits flush with the right wall.
    let pad = 2 * width.saturating_sub(3);
    text.push_str(&format!("  Score:{score:>pad$}\n"));
    text
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, rows: &[Vec<bool>], score: u32) -> io::Result<()> {
        self.out.write_all(frame_text(rows, score).as_bytes())?;
        self.out.flush()
    }
}

/// Keeps every frame it is given; for tests and replays.
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub frames: Vec<(Vec<Vec<bool>>, u32)>,
}

impl Renderer for FrameRecorder {
    fn draw(&mut self, rows: &[Vec<bool>], score: u32) -> io::Result<()> {
        self.frames.push((rows.to_vec(), score));
        Ok(())
    }
}
