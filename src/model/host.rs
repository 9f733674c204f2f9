//! The boundary between the layout engine and the compositor that owns the
//! windows, workspaces and monitors.
//!
//! The engine only ever reads snapshots through [`LayoutHost`] and reports its
//! decisions back through the same trait. It never holds on to host state.

use serde::{Deserialize, Serialize};

use super::window::{FullscreenMode, MonitorId, WindowId, WorkspaceId};
use crate::sys::geometry::{Point, Rect, Size};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub id: MonitorId,
    pub frame: Rect,
    /// Space claimed by bars and panels along the top and left edges.
    pub reserved_top_left: Point,
    /// Space claimed along the bottom and right edges.
    pub reserved_bottom_right: Point,
    pub active_workspace: Option<WorkspaceId>,
    /// The special workspace currently shown on top of the active one, if any.
    pub active_special_workspace: Option<WorkspaceId>,
}

impl MonitorInfo {
    pub fn new(id: MonitorId, frame: Rect) -> Self {
        Self {
            id,
            frame,
            reserved_top_left: Point::default(),
            reserved_bottom_right: Point::default(),
            active_workspace: None,
            active_special_workspace: None,
        }
    }

    /// The monitor frame without reserved areas.
    pub fn usable_area(&self) -> Rect {
        self.frame.inset(self.reserved_top_left, self.reserved_bottom_right)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub id: WorkspaceId,
    pub monitor: Option<MonitorId>,
    pub is_special: bool,
    pub fullscreen: Option<(WindowId, FullscreenMode)>,
    /// Per-workspace orientation override, as written in the host's rules.
    pub orientation_rule: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub workspace: WorkspaceId,
    pub monitor: MonitorId,
    pub frame: Rect,
    pub floating: bool,
    pub fullscreen: FullscreenMode,
    /// Set while the window is being mapped for the first time.
    pub first_map: bool,
    pub max_size: Option<Size>,
}

pub trait LayoutHost {
    fn window(&self, id: WindowId) -> Option<WindowInfo>;
    fn workspace(&self, id: WorkspaceId) -> Option<WorkspaceInfo>;
    fn monitor(&self, id: MonitorId) -> Option<MonitorInfo>;
    fn focused_window(&self) -> Option<WindowId>;
    fn pointer(&self) -> Point;
    /// Whether the user is currently dragging a window with the pointer.
    fn is_interactive_move(&self) -> bool;

    fn apply_geometry(&mut self, window: WindowId, frame: Rect, suppress_animation: bool);
    /// The window cannot be tiled and should be made floating instead.
    fn request_floating_fallback(&mut self, window: WindowId);
    fn request_focus(&mut self, window: WindowId);
    fn set_fullscreen_mode(&mut self, window: WindowId, mode: FullscreenMode);
    fn warp_cursor(&mut self, to: Point);
    fn move_window_to_workspace(&mut self, window: WindowId, workspace: WorkspaceId);
}
