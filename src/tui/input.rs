//! Cursor movement across the two tile grids.

use crossterm::event::KeyCode;
use trivia_match::{Side, TileKey};

/// Tiles per grid row.
pub const COLUMNS: usize = 3;

/// Keyboard cursor: a grid and a slot in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    side: Side,
    index: usize,
}

impl Default for GridCursor {
    fn default() -> Self {
        Self {
            side: Side::Question,
            index: 0,
        }
    }
}

impl GridCursor {
    /// Tile under the cursor.
    pub fn key(self) -> TileKey {
        TileKey::new(self.side, self.index)
    }

    /// Moves the cursor for an arrow key on grids of `len` tiles.
    ///
    /// Moving right off the question grid lands in the answer grid on the
    /// same row, and left off the answer grid comes back.
    pub fn moved(self, key: KeyCode, len: usize) -> Self {
        if len == 0 {
            return self;
        }
        let column = self.index % COLUMNS;
        let row_start = self.index - column;
        match key {
            KeyCode::Right if column + 1 < COLUMNS && self.index + 1 < len => {
                self.with_index(self.index + 1)
            }
            KeyCode::Right if self.side == Side::Question => Self {
                side: Side::Answer,
                index: row_start.min(len - 1),
            },
            KeyCode::Left if column > 0 => self.with_index(self.index - 1),
            KeyCode::Left if self.side == Side::Answer => Self {
                side: Side::Question,
                index: (row_start + COLUMNS - 1).min(len - 1),
            },
            KeyCode::Down if self.index + COLUMNS < len => self.with_index(self.index + COLUMNS),
            KeyCode::Up if self.index >= COLUMNS => self.with_index(self.index - COLUMNS),
            _ => self,
        }
    }

    /// Jumps to the same slot in the other grid.
    pub fn switched(self, len: usize) -> Self {
        Self {
            side: self.side.other(),
            index: self.index.min(len.saturating_sub(1)),
        }
    }

    fn with_index(self, index: usize) -> Self {
        Self { index, ..self }
    }
}
