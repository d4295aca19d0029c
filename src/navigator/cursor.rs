//! Cursor and sliding window over a row set.
//!
//! The window never re-centers: moving past either edge slides it by a
//! single row. All inputs are clamped, so the invariant
//! `start <= cursor <= end <= len` and `end - start <= capacity` holds
//! after every call.

use std::ops::Range;

pub const DEFAULT_WINDOW_HEIGHT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowedCursor {
    cursor: usize,
    start: usize,
    end: usize,
    capacity: usize,
}

impl Default for WindowedCursor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_HEIGHT)
    }
}

impl WindowedCursor {
    pub const fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            start: 0,
            end: 0,
            capacity: if capacity == 0 { 1 } else { capacity },
        }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn window(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Offset of the cursor inside the visible window, if anything is visible.
    pub const fn highlight(&self) -> Option<usize> {
        if self.end > self.start {
            Some(self.cursor - self.start)
        } else {
            None
        }
    }

    /// Move the cursor by `delta` rows. Moving past either end is a no-op.
    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len > 0 {
            self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
        }
        self.sync(len);
    }

    /// Jump to an absolute row, clamped to the last row.
    pub fn move_to(&mut self, index: usize, len: usize) {
        self.cursor = index;
        self.sync(len);
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.start = 0;
        self.end = 0;
    }

    /// Recompute the window for a row set of length `len`.
    ///
    /// Called after every transition, including ones that did not touch
    /// the cursor, since the row set may have shrunk or grown underneath it.
    pub fn sync(&mut self, len: usize) {
        let height = len.min(self.capacity);

        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        if self.start > len {
            self.start = len;
        }
        if self.cursor == 0 {
            self.start = 0;
        }

        let end = self.start + height;
        if self.cursor + 1 == self.start {
            self.start -= 1;
        } else if len > 0 && self.cursor == end {
            self.start += 1;
        }

        // Only reachable after an absolute jump or a large shrink.
        if self.cursor < self.start {
            self.start = self.cursor;
        } else if height > 0 && self.cursor >= self.start + height {
            self.start = self.cursor + 1 - height;
        }

        self.end = (self.start + height).min(len);
    }
}
