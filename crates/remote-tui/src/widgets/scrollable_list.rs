//! Selection and scroll position over a list that is only known by length.
//!
//! The rows themselves live elsewhere (the browser's visible set), so every
//! operation that depends on the list takes its current `len`.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollableList {
    pub selected: usize,
    pub scroll_offset: usize,
}

impl ScrollableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// Pull the selection back inside a list that shrank.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + n).min(len - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Inclusive index range drawn in `height` rows, `None` when nothing is.
    /// Call `ensure_visible` first.
    pub fn window(&self, height: usize, len: usize) -> Option<(usize, usize)> {
        if height == 0 || self.scroll_offset >= len {
            return None;
        }
        let stop = (self.scroll_offset + height).min(len) - 1;
        Some((self.scroll_offset, stop))
    }

    pub fn selected_in_view(&self, height: usize) -> usize {
        self.selected
            .saturating_sub(self.scroll_offset)
            .min(height.saturating_sub(1))
    }

    /// Select the row at `row` within the drawn area.
    /// Returns true if it landed on a row.
    pub fn handle_click(&mut self, row: usize, len: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < len {
            self.selected = target;
            return true;
        }
        false
    }
}
