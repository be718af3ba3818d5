/// Cursor over the playlist on the list screen.
#[derive(Debug, Default)]
pub(crate) struct PlaylistScreen {
    pub(crate) selected: usize,
}

impl PlaylistScreen {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor on a valid row after the playlist shrank.
    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

/// Vertical scroll offset for a block of lyrics.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ScrollState {
    pub(crate) offset: u16,
}

impl ScrollState {
    /// Scroll by `delta` lines, staying within `0..=max`.
    pub(crate) fn scroll_by(&mut self, delta: i32, max: usize) {
        let max = max.min(u16::MAX as usize) as i32;
        self.offset = (self.offset as i32 + delta).clamp(0, max.max(0)) as u16;
    }

    pub(crate) fn reset(&mut self) {
        self.offset = 0;
    }
}
