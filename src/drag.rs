//! Pointer tracking for the floating lyrics panel.
//!
//! Positions are terminal cells. The panel can only be picked up by its top
//! row (the handle) and is always kept fully inside the viewport. Once a drag
//! starts, every move/release event is routed here regardless of where the
//! pointer is, so dragging quickly past the handle does not drop the panel.

use ratatui::layout::{Position, Rect, Size};

/// Default panel size: enough for a title, a few lines and the controls.
pub const OVERLAY_SIZE: Size = Size {
    width: 44,
    height: 18,
};
/// Where a freshly opened panel appears.
pub const DEFAULT_POSITION: Position = Position { x: 2, y: 3 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// `grab` is the pointer position relative to the panel's top-left corner
    /// at the moment the drag began.
    Dragging { grab: Position },
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    position: Position,
    size: Size,
    viewport: Rect,
    state: DragState,
}

impl DragTracker {
    /// A tracker with the default size, placed at [`DEFAULT_POSITION`].
    pub fn new(viewport: Rect) -> Self {
        Self::with_size(OVERLAY_SIZE, viewport)
    }

    pub fn with_size(size: Size, viewport: Rect) -> Self {
        let mut tracker = Self {
            position: DEFAULT_POSITION,
            size,
            viewport,
            state: DragState::Idle,
        };
        tracker.clamp();
        tracker
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The area currently covered by the panel.
    pub fn panel(&self) -> Rect {
        let width = self.size.width.min(self.viewport.width);
        let height = self.size.height.min(self.viewport.height);
        Rect::new(self.position.x, self.position.y, width, height)
    }

    /// The row that accepts drag starts.
    pub fn handle(&self) -> Rect {
        let panel = self.panel();
        Rect::new(panel.x, panel.y, panel.width, panel.height.min(1))
    }

    /// Start dragging if `pointer` is on the handle. Returns whether a drag
    /// started.
    pub fn begin_drag(&mut self, pointer: Position) -> bool {
        if !self.handle().contains(pointer) {
            return false;
        }
        self.state = DragState::Dragging {
            grab: Position::new(pointer.x - self.position.x, pointer.y - self.position.y),
        };
        true
    }

    /// Follow the pointer while dragging. Returns whether the panel moved.
    pub fn on_pointer_move(&mut self, pointer: Position) -> bool {
        let DragState::Dragging { grab } = self.state else {
            return false;
        };

        let previous = self.position;
        self.position = Position::new(
            pointer.x.saturating_sub(grab.x),
            pointer.y.saturating_sub(grab.y),
        );
        self.clamp();
        self.position != previous
    }

    pub fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }

    /// Adopt a new viewport (terminal resize) and pull the panel back inside.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.clamp();
    }

    fn clamp(&mut self) {
        let panel_width = self.size.width.min(self.viewport.width);
        let panel_height = self.size.height.min(self.viewport.height);
        let max_x = self.viewport.right().saturating_sub(panel_width);
        let max_y = self.viewport.bottom().saturating_sub(panel_height);
        self.position.x = self.position.x.clamp(self.viewport.x, max_x.max(self.viewport.x));
        self.position.y = self.position.y.clamp(self.viewport.y, max_y.max(self.viewport.y));
    }
}
