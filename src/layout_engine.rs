mod engine;
mod graph;
mod resize;
pub mod systems;
pub(crate) mod utils;
mod workspaces;

pub use engine::{CommandParseError, LayoutCommand, LayoutEngine, LayoutEvent};
pub use graph::{MasterOrientation, Orientation};
pub use resize::{ResizeCorner, ResizeMode};
pub use systems::{FocusTarget, MasterLayoutSystem};
pub(crate) use workspaces::WorkspaceOrientations;
