//! Arena: occupancy grid, collision, commit, line clear, spawn placement.

use crate::geometry::Shape;
use thiserror::Error;

/// Absolute grid position of a piece's pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Absolute cells covered by `shape` when displaced by (dx, dy).
    pub fn cells(self, shape: &Shape, dx: i32, dy: i32) -> [(i32, i32); 4] {
        shape.map(|(ox, oy)| (self.x + ox + dx, self.y + oy + dy))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("invalid arena dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i64, height: i64 },
}

/// Result of a line-clear pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClear {
    pub lines: u32,
    pub score: u32,
}

/// Points for clearing `lines` rows at once.
#[inline]
pub const fn line_clear_points(lines: u32) -> u32 {
    lines * lines
}

/// Playfield: rows[y][x], rows[0] is the top. `true` = landed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    width: usize,
    height: usize,
    rows: Vec<Vec<bool>>,
}

impl Arena {
    pub fn new(width: i32, height: i32) -> Result<Self, ArenaError> {
        if width <= 0 || height <= 0 {
            return Err(ArenaError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        let (w, h) = (width as usize, height as usize);
        Ok(Self {
            width: w,
            height: h,
            rows: (0..h).map(|_| vec![false; w]).collect(),
        })
    }

    /// Build an arena from explicit rows (top first). All rows must share a non-zero length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ArenaError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(ArenaError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows top to bottom, for renderers.
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// True for marked cells and for every cell outside the grid.
    ///
    /// Walls, floor and ceiling all read as occupied; every collision check
    /// goes through here.
    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some((x, y)) => self.rows[y][x],
            None => true,
        }
    }

    /// Mark or clear one cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_occupied(&mut self, x: i32, y: i32, occupied: bool) {
        if let Some((x, y)) = self.index(x, y) {
            self.rows[y][x] = occupied;
        }
    }

    /// True if `shape` at `anchor` displaced by (dx, dy) overlaps nothing.
    pub fn can_place(&self, anchor: Anchor, shape: &Shape, dx: i32, dy: i32) -> bool {
        anchor
            .cells(shape, dx, dy)
            .iter()
            .all(|&(x, y)| !self.is_occupied(x, y))
    }

    /// Stamp (`true`) or erase (`false`) a piece's footprint.
    pub fn commit(&mut self, anchor: Anchor, shape: &Shape, occupied: bool) {
        for (x, y) in anchor.cells(shape, 0, 0) {
            self.set_occupied(x, y, occupied);
        }
    }

    /// Remove every full row, pad with empty rows on top, add lines² to `score`.
    pub fn clear_lines(&mut self, score: u32) -> LineClear {
        let full: Vec<bool> = self.rows.iter().map(|row| row.iter().all(|&c| c)).collect();
        let lines = full.iter().filter(|&&f| f).count();
        if lines == 0 {
            return LineClear { lines: 0, score };
        }

        let mut rows = Vec::with_capacity(self.height);
        rows.resize_with(lines, || vec![false; self.width]);
        rows.extend(
            self.rows
                .drain(..)
                .zip(&full)
                .filter_map(|(row, &is_full)| (!is_full).then_some(row)),
        );
        self.rows = rows;

        let lines = lines as u32;
        LineClear {
            lines,
            score: score + line_clear_points(lines),
        }
    }

    /// Anchor that centres `shape` horizontally with its top cell on row 0.
    pub fn spawn_position(&self, shape: &Shape) -> Anchor {
        let min_dx = shape.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
        let min_dy = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
        let mut columns: Vec<i32> = shape.iter().map(|&(dx, _)| dx).collect();
        columns.sort_unstable();
        columns.dedup();
        let span = columns.len() as i32;
        Anchor {
            x: (self.width as i32 - span).div_euclid(2) + min_dx.abs(),
            y: min_dy.abs(),
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&c| c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PieceKind;

    fn grid(rows: &[&str]) -> Arena {
        Arena::from_rows(
            rows.iter()
                .map(|r| r.chars().map(|c| c == '#').collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn new_arena_is_empty() {
        let arena = Arena::new(4, 3).unwrap();
        assert_eq!((arena.width(), arena.height()), (4, 3));
        assert_eq!(arena.occupied_count(), 0);
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        assert_eq!(
            Arena::new(0, 5),
            Err(ArenaError::InvalidDimensions { width: 0, height: 5 })
        );
        assert!(Arena::new(5, -1).is_err());
        assert!(Arena::from_rows(vec![]).is_err());
        assert!(Arena::from_rows(vec![vec![true], vec![true, false]]).is_err());
    }

    #[test]
    fn outside_reads_as_occupied() {
        let arena = Arena::new(3, 3).unwrap();
        assert!(arena.is_occupied(-1, 0));
        assert!(arena.is_occupied(3, 0));
        assert!(arena.is_occupied(0, -1));
        assert!(arena.is_occupied(0, 3));
        assert!(!arena.is_occupied(2, 2));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut arena = Arena::new(2, 2).unwrap();
        arena.set_occupied(-1, 0, true);
        arena.set_occupied(0, 5, true);
        assert_eq!(arena.occupied_count(), 0);
    }

    #[test]
    fn single_block_rejects_overlap_only() {
        let mut arena = Arena::new(5, 5).unwrap();
        arena.set_occupied(2, 2, true);
        let dot: Shape = [(0, 0); 4];
        assert!(!arena.can_place(Anchor::new(2, 2), &dot, 0, 0));
        assert!(arena.can_place(Anchor::new(2, 2), &dot, 1, 0));
        assert!(arena.can_place(Anchor::new(1, 2), &dot, 0, 0));
        assert!(!arena.can_place(Anchor::new(1, 2), &dot, 1, 0));
    }

    #[test]
    fn walls_block_pieces() {
        let arena = Arena::new(4, 6).unwrap();
        let i = PieceKind::I.shape();
        assert!(arena.can_place(Anchor::new(0, 1), &i, 0, 0));
        assert!(!arena.can_place(Anchor::new(0, 1), &i, -1, 0));
        assert!(!arena.can_place(Anchor::new(0, 0), &i, 0, 0));
        assert!(!arena.can_place(Anchor::new(0, 3), &i, 0, 1));
    }

    #[test]
    fn commit_then_erase_round_trips() {
        let mut arena = grid(&["#..", "...", "..#"]);
        let before = arena.clone();
        let shape = PieceKind::O.shape();
        arena.commit(Anchor::new(0, 1), &shape, true);
        assert_eq!(arena.occupied_count(), 6);
        arena.commit(Anchor::new(0, 1), &shape, false);
        assert_eq!(arena, before);
    }

    #[test]
    fn two_lines_at_once_score_four() {
        let mut arena = grid(&["###", "...", "###", "..."]);
        let clear = arena.clear_lines(10);
        assert_eq!(clear, LineClear { lines: 2, score: 14 });
        assert_eq!(arena, Arena::new(3, 4).unwrap());
    }

    #[test]
    fn clear_keeps_remaining_rows_in_order() {
        let mut arena = grid(&["#..", "###", ".#.", "###", "..#"]);
        let clear = arena.clear_lines(0);
        assert_eq!(clear.lines, 2);
        assert_eq!(clear.score, 4);
        assert_eq!(arena, grid(&["...", "...", "#..", ".#.", "..#"]));
    }

    #[test]
    fn no_full_rows_leaves_grid_and_score() {
        let mut arena = grid(&["##.", ".##"]);
        let before = arena.clone();
        assert_eq!(arena.clear_lines(3), LineClear { lines: 0, score: 3 });
        assert_eq!(arena, before);
    }

    #[test]
    fn o_piece_spawns_centred() {
        let arena = Arena::new(6, 6).unwrap();
        assert_eq!(arena.spawn_position(&PieceKind::O.shape()), Anchor::new(2, 0));
    }

    #[test]
    fn spawn_puts_top_cell_on_row_zero() {
        let arena = Arena::new(10, 20).unwrap();
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let anchor = arena.spawn_position(&shape);
            let cells = anchor.cells(&shape, 0, 0);
            assert_eq!(cells.iter().map(|c| c.1).min(), Some(0), "{kind:?}");
            assert!(arena.can_place(anchor, &shape, 0, 0), "{kind:?}");
        }
    }

    #[test]
    fn spawn_column_for_vertical_i() {
        // Single column wide: (10 - 1) / 2 = 4, no left extent.
        let arena = Arena::new(10, 20).unwrap();
        assert_eq!(arena.spawn_position(&PieceKind::I.shape()), Anchor::new(4, 1));
    }
}
