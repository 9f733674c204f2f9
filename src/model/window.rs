use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::host::{LayoutHost, WindowInfo};

/// An identifier representing a window, assigned by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(id: u64) -> WindowId { WindowId(id) }

    pub fn get(&self) -> u64 { self.0 }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Special workspaces are ordinary ids flagged by the host in [`super::WorkspaceInfo`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WorkspaceId(i64);

impl WorkspaceId {
    pub const fn new(id: i64) -> WorkspaceId { WorkspaceId(id) }

    pub fn get(&self) -> i64 { self.0 }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MonitorId(u32);

impl MonitorId {
    pub const fn new(id: u32) -> MonitorId { MonitorId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FullscreenMode {
    #[default]
    None,
    /// Covers the usable area of the monitor.
    Maximized,
    /// Covers the whole monitor.
    Fullscreen,
}

impl FullscreenMode {
    pub fn is_active(self) -> bool { self != FullscreenMode::None }
}

/// A non-owning reference from a layout node to a host window.
///
/// The window may disappear at any time; [`WindowRef::resolve`] returns `None`
/// once it has.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct WindowRef {
    id: WindowId,
}

impl WindowRef {
    pub fn new(id: WindowId) -> Self { Self { id } }

    pub fn id(&self) -> WindowId { self.id }

    pub fn resolve<H: LayoutHost + ?Sized>(&self, host: &H) -> Option<WindowInfo> {
        host.window(self.id)
    }
}
