//! Board module - manages the token grid
//!
//! The board is a cols x rows grid stored as a flat array for cache
//! locality, row-major: `index = row * cols + col`. Each slot holds a token
//! or is empty (empty is transient during a resolution pass). A separate
//! blocked mask marks cells permanently excluded from play, used for
//! non-rectangular level shapes; blocked cells never hold tokens.

use crate::gems::GemFactory;
use gemfall_types::{Token, TokenKind};

/// The token grid plus the blocked-cell mask
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Option<Token>>,
    blocked: Vec<bool>,
}

impl Board {
    /// Create an empty board; returns `None` for degenerate dimensions
    pub fn new(cols: usize, rows: usize) -> Option<Self> {
        if cols == 0 || rows == 0 {
            return None;
        }
        Some(Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
            blocked: vec![false; cols * rows],
        })
    }

    /// Build a board from wire-name kinds, creating tokens through `factory`
    ///
    /// Returns `None` if the slice length does not match `cols * rows` or a
    /// name fails to parse. Primarily for tests and fixtures.
    pub fn from_kinds(
        cols: usize,
        rows: usize,
        kinds: &[&str],
        factory: &mut GemFactory,
    ) -> Option<Self> {
        let mut board = Self::new(cols, rows)?;
        if kinds.len() != board.len() {
            return None;
        }
        for (index, name) in kinds.iter().enumerate() {
            let kind = TokenKind::from_str(name)?;
            board.cells[index] = Some(factory.create(kind));
        }
        Some(board)
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total cell count (`cols * rows`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the board has no cells (never true for a constructed board)
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index for (col, row), or `None` when out of bounds
    #[inline]
    pub fn index(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// (col, row) for a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.cols, index / self.cols)
    }

    /// Whether the flat index lies on the board
    pub fn in_bounds(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// Token at the given index (`None` when empty, blocked, or out of bounds)
    pub fn get(&self, index: usize) -> Option<Token> {
        self.cells.get(index).copied().flatten()
    }

    /// Place a token; ignored for blocked or out-of-bounds cells
    pub fn set(&mut self, index: usize, token: Option<Token>) {
        if index < self.cells.len() && !self.blocked[index] {
            self.cells[index] = token;
        }
    }

    /// Remove and return the token at the given index
    pub fn take(&mut self, index: usize) -> Option<Token> {
        self.cells.get_mut(index).and_then(|cell| cell.take())
    }

    /// Whether the cell is permanently excluded from play
    pub fn is_blocked(&self, index: usize) -> bool {
        self.blocked.get(index).copied().unwrap_or(true)
    }

    /// Mark a cell as permanently excluded from play, dropping its token
    pub fn block(&mut self, index: usize) {
        if index < self.cells.len() {
            self.blocked[index] = true;
            self.cells[index] = None;
        }
    }

    /// Whether two indices are 4-directionally adjacent
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        let dx = ax.abs_diff(bx);
        let dy = ay.abs_diff(by);
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }

    /// Exchange the tokens at two indices
    pub fn swap(&mut self, a: usize, b: usize) {
        if self.in_bounds(a) && self.in_bounds(b) {
            self.cells.swap(a, b);
        }
    }

    /// The four orthogonal neighbors of an index (clipped to bounds)
    pub fn orthogonal_neighbors(&self, index: usize) -> arrayvec::ArrayVec<usize, 4> {
        let mut neighbors = arrayvec::ArrayVec::new();
        let (col, row) = self.coords(index);
        if col > 0 {
            neighbors.push(index - 1);
        }
        if col + 1 < self.cols {
            neighbors.push(index + 1);
        }
        if row > 0 {
            neighbors.push(index - self.cols);
        }
        if row + 1 < self.rows {
            neighbors.push(index + self.cols);
        }
        neighbors
    }

    /// Number of cells currently holding a token
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Number of playable (non-blocked) cells
    pub fn playable_count(&self) -> usize {
        self.blocked.iter().filter(|blocked| !**blocked).count()
    }

    /// Iterator over `(index, token)` for occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Token)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|token| (index, token)))
    }
}
