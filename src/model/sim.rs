//! An in-memory [`LayoutHost`] that records everything the layout asks of it.
//!
//! Used by the unit tests and by the `rift-master` binary to replay scripts.

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use super::host::{LayoutHost, MonitorInfo, WindowInfo, WorkspaceInfo};
use super::window::{FullscreenMode, MonitorId, WindowId, WorkspaceId};
use crate::common::collections::BTreeMap;
use crate::sys::geometry::{Point, Rect};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown monitor {0:?}")]
    UnknownMonitor(MonitorId),
    #[error("unknown workspace {0:?}")]
    UnknownWorkspace(WorkspaceId),
    #[error("workspace {0:?} is not on a monitor")]
    DetachedWorkspace(WorkspaceId),
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),
}

/// One `apply_geometry` call as the host received it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AppliedFrame {
    pub window: WindowId,
    pub frame: Rect,
    pub suppress_animation: bool,
}

#[derive(Default, Debug)]
pub struct SimHost {
    windows: BTreeMap<WindowId, WindowInfo>,
    workspaces: BTreeMap<WorkspaceId, WorkspaceInfo>,
    monitors: BTreeMap<MonitorId, MonitorInfo>,
    focused: Option<WindowId>,
    pointer: Point,
    moving: bool,
    applied: Vec<AppliedFrame>,
    floated: Vec<WindowId>,
    warps: Vec<Point>,
}

impl SimHost {
    pub fn new() -> Self { Self::default() }

    pub fn add_monitor(&mut self, id: MonitorId, frame: Rect) -> &mut MonitorInfo {
        self.monitors.entry(id).or_insert_with(|| MonitorInfo::new(id, frame))
    }

    /// Adds a regular workspace. The first one added to a monitor becomes active there.
    pub fn add_workspace(
        &mut self,
        id: WorkspaceId,
        monitor: MonitorId,
    ) -> Result<&mut WorkspaceInfo, SimError> {
        let mon = self.monitors.get_mut(&monitor).ok_or(SimError::UnknownMonitor(monitor))?;
        if mon.active_workspace.is_none() {
            mon.active_workspace = Some(id);
        }
        Ok(self.insert_workspace(id, monitor, false))
    }

    /// Adds a special workspace and shows it on `monitor`.
    pub fn add_special_workspace(
        &mut self,
        id: WorkspaceId,
        monitor: MonitorId,
    ) -> Result<&mut WorkspaceInfo, SimError> {
        let mon = self.monitors.get_mut(&monitor).ok_or(SimError::UnknownMonitor(monitor))?;
        mon.active_special_workspace = Some(id);
        Ok(self.insert_workspace(id, monitor, true))
    }

    fn insert_workspace(
        &mut self,
        id: WorkspaceId,
        monitor: MonitorId,
        is_special: bool,
    ) -> &mut WorkspaceInfo {
        self.workspaces.entry(id).or_insert_with(|| WorkspaceInfo {
            id,
            monitor: Some(monitor),
            is_special,
            fullscreen: None,
            orientation_rule: None,
        })
    }

    pub fn remove_workspace(&mut self, id: WorkspaceId) {
        self.workspaces.remove(&id);
        for monitor in self.monitors.values_mut() {
            if monitor.active_workspace == Some(id) {
                monitor.active_workspace = None;
            }
            if monitor.active_special_workspace == Some(id) {
                monitor.active_special_workspace = None;
            }
        }
    }

    /// Maps a new tiled window on `workspace`.
    pub fn add_window(
        &mut self,
        id: WindowId,
        workspace: WorkspaceId,
    ) -> Result<&mut WindowInfo, SimError> {
        let ws = self.workspaces.get(&workspace).ok_or(SimError::UnknownWorkspace(workspace))?;
        let monitor = ws.monitor.ok_or(SimError::DetachedWorkspace(workspace))?;
        Ok(self.windows.entry(id).or_insert_with(|| WindowInfo {
            id,
            workspace,
            monitor,
            frame: Rect::default(),
            floating: false,
            fullscreen: FullscreenMode::None,
            first_map: true,
            max_size: None,
        }))
    }

    pub fn remove_window(&mut self, id: WindowId) -> Option<WindowInfo> {
        if self.focused == Some(id) {
            self.focused = None;
        }
        for ws in self.workspaces.values_mut() {
            if ws.fullscreen.is_some_and(|(w, _)| w == id) {
                ws.fullscreen = None;
            }
        }
        self.windows.remove(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowInfo> {
        self.windows.get_mut(&id)
    }

    pub fn workspace_mut(&mut self, id: WorkspaceId) -> Option<&mut WorkspaceInfo> {
        self.workspaces.get_mut(&id)
    }

    pub fn monitor_mut(&mut self, id: MonitorId) -> Option<&mut MonitorInfo> {
        self.monitors.get_mut(&id)
    }

    pub fn monitors(&self) -> impl Iterator<Item = &MonitorInfo> { self.monitors.values() }

    pub fn windows(&self) -> impl Iterator<Item = &WindowInfo> { self.windows.values() }

    pub fn set_focus(&mut self, window: Option<WindowId>) { self.focused = window; }

    pub fn set_pointer(&mut self, pointer: Point) { self.pointer = pointer; }

    pub fn set_interactive_move(&mut self, moving: bool) { self.moving = moving; }

    /// The last frame applied to `window`.
    pub fn frame(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(&window).map(|w| w.frame)
    }

    pub fn applied(&self) -> &[AppliedFrame] { &self.applied }

    pub fn floated(&self) -> &[WindowId] { &self.floated }

    pub fn warps(&self) -> &[Point] { &self.warps }

    pub fn clear_log(&mut self) {
        self.applied.clear();
        self.floated.clear();
        self.warps.clear();
    }
}

impl LayoutHost for SimHost {
    fn window(&self, id: WindowId) -> Option<WindowInfo> { self.windows.get(&id).cloned() }

    fn workspace(&self, id: WorkspaceId) -> Option<WorkspaceInfo> {
        self.workspaces.get(&id).cloned()
    }

    fn monitor(&self, id: MonitorId) -> Option<MonitorInfo> { self.monitors.get(&id).cloned() }

    fn focused_window(&self) -> Option<WindowId> { self.focused }

    fn pointer(&self) -> Point { self.pointer }

    fn is_interactive_move(&self) -> bool { self.moving }

    fn apply_geometry(&mut self, window: WindowId, frame: Rect, suppress_animation: bool) {
        trace!(?window, ?frame, suppress_animation, "apply_geometry");
        if let Some(info) = self.windows.get_mut(&window) {
            info.frame = frame;
            info.first_map = false;
        }
        self.applied.push(AppliedFrame { window, frame, suppress_animation });
    }

    fn request_floating_fallback(&mut self, window: WindowId) {
        if let Some(info) = self.windows.get_mut(&window) {
            info.floating = true;
        }
        self.floated.push(window);
    }

    fn request_focus(&mut self, window: WindowId) {
        if self.windows.contains_key(&window) {
            self.focused = Some(window);
        }
    }

    fn set_fullscreen_mode(&mut self, window: WindowId, mode: FullscreenMode) {
        let Some(info) = self.windows.get_mut(&window) else { return };
        info.fullscreen = mode;
        let Some(ws) = self.workspaces.get_mut(&info.workspace) else { return };
        if mode.is_active() {
            ws.fullscreen = Some((window, mode));
        } else if ws.fullscreen.is_some_and(|(w, _)| w == window) {
            ws.fullscreen = None;
        }
    }

    fn warp_cursor(&mut self, to: Point) {
        self.pointer = to;
        self.warps.push(to);
    }

    fn move_window_to_workspace(&mut self, window: WindowId, workspace: WorkspaceId) {
        let monitor = self.workspaces.get(&workspace).and_then(|ws| ws.monitor);
        let Some(info) = self.windows.get_mut(&window) else { return };
        info.workspace = workspace;
        if let Some(monitor) = monitor {
            info.monitor = monitor;
        }
    }
}
