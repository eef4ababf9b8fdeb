//! Linear undo/redo history of full-buffer snapshots

use crate::grid::PixelBuffer;

/// Default maximum number of undo snapshots retained
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Two LIFO stacks of buffer snapshots
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<PixelBuffer>,
    redo: Vec<PixelBuffer>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// History keeping at most `limit` undo steps (minimum 1)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the pre-mutation buffer. Invalidates the redo stack.
    pub fn record(&mut self, before: PixelBuffer) {
        self.undo.push(before);
        if self.undo.len() > self.limit {
            // Oldest snapshot falls off
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Pop the last snapshot, stashing `current` for redo
    pub fn undo(&mut self, current: PixelBuffer) -> Option<PixelBuffer> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Pop the last undone snapshot, stashing `current` for undo
    pub fn redo(&mut self, current: PixelBuffer) -> Option<PixelBuffer> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
