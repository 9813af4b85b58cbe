//! Piece geometry: the seven canonical shapes, rotation, random spawn shapes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A piece-local (dx, dy) offset from the pivot at (0, 0).
pub type Offset = (i32, i32);

/// Four offsets describing one orientation of a piece.
pub type Shape = [Offset; 4];

/// Tetromino kinds (I, J, L, S, Z, T, O).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    S,
    Z,
    T,
    O,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::S, Self::Z, Self::T, Self::O];

    /// Canonical shape, returned by value so callers can rotate and move it freely.
    pub fn shape(self) -> Shape {
        match self {
            Self::I => [(0, 0), (0, 1), (0, -1), (0, 2)],
            Self::J => [(0, 0), (0, 1), (0, -1), (-1, 1)],
            Self::L => [(0, 0), (0, 1), (0, -1), (1, 1)],
            Self::S => [(0, 0), (0, 1), (-1, 1), (1, 0)],
            Self::Z => [(0, 0), (0, 1), (-1, 0), (1, 1)],
            Self::T => [(0, 0), (0, 1), (-1, 0), (1, 0)],
            Self::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
        }
    }
}

/// Quarter turn direction. With y growing downwards, +90° turns clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// +90°
    Cw,
    /// −90°
    Ccw,
}

impl Rotation {
    /// (cos, sin) of the angle; exact at quarter turns.
    #[inline]
    fn cos_sin(self) -> (i32, i32) {
        match self {
            Self::Cw => (0, 1),
            Self::Ccw => (0, -1),
        }
    }
}

/// Rotate every offset about the pivot. Pure: no bounds or collision checks.
pub fn rotate(shape: &Shape, rotation: Rotation) -> Shape {
    let (cos, sin) = rotation.cos_sin();
    shape.map(|(dx, dy)| (dx * cos - dy * sin, dx * sin + dy * cos))
}

pub fn rotate_cw(shape: &Shape) -> Shape {
    rotate(shape, Rotation::Cw)
}

pub fn rotate_ccw(shape: &Shape) -> Shape {
    rotate(shape, Rotation::Ccw)
}

/// Spawn shapes: a uniformly chosen kind turned 0..=3 quarter turns clockwise.
///
/// The only source of non-determinism in the game. Seed it (or hand it any
/// [`Rng`]) to replay a fixed sequence of pieces.
#[derive(Debug, Clone)]
pub struct PieceGenerator<R = StdRng> {
    rng: R,
}

impl PieceGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> PieceGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Kind and quarter-turn count of the next piece.
    pub fn next_kind(&mut self) -> (PieceKind, u8) {
        let kind = PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())];
        let turns = self.rng.gen_range(0..4u8);
        (kind, turns)
    }

    pub fn next_shape(&mut self) -> Shape {
        let (kind, turns) = self.next_kind();
        (0..turns).fold(kind.shape(), |shape, _| rotate_cw(&shape))
    }
}

/// Order-insensitive view of a shape, for comparing orientations.
pub fn cell_set(shape: &Shape) -> Vec<Offset> {
    let mut cells = shape.to_vec();
    cells.sort_unstable();
    cells
}
