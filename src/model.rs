pub mod host;
pub mod sim;
pub mod window;

pub use host::{LayoutHost, MonitorInfo, WindowInfo, WorkspaceInfo};
pub use sim::SimHost;
pub use window::{FullscreenMode, MonitorId, WindowId, WindowRef, WorkspaceId};
