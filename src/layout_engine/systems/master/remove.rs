use tracing::debug;

use super::MasterLayoutSystem;
use crate::model::{FullscreenMode, LayoutHost, WindowId};

impl MasterLayoutSystem {
    /// Drops the node of `window`, which may already be gone from the host.
    pub fn on_window_untiled(&mut self, host: &mut dyn LayoutHost, window: WindowId) {
        let Some(id) = self.nodes.find(window) else { return };
        let departing = self.nodes[id].clone();
        let workspace = departing.workspace;
        let masters_before = self.nodes.masters_on_workspace(workspace);

        if host.window(window).is_some_and(|info| info.fullscreen.is_active()) {
            host.set_fullscreen_mode(window, FullscreenMode::None);
        }

        if departing.is_master && (masters_before <= 1 || !self.settings.allow_small_split) {
            let next = self
                .nodes
                .on_workspace(workspace)
                .find(|(n, node)| *n != id && !node.is_master)
                .map(|(n, _)| n);
            if let Some(next) = next {
                self.nodes[next].is_master = true;
                self.nodes[next].perc_master = departing.perc_master;
            }
        }

        self.nodes.remove(id);

        let remaining = self.nodes.ids_on(workspace);
        if self.nodes.masters_on_workspace(workspace) == remaining.len() && masters_before > 1 {
            if let Some(&last) = remaining.last() {
                self.nodes[last].is_master = false;
            }
        }
        if let [only] = remaining[..] {
            self.nodes[only].is_master = true;
        }
        debug!(?window, ?workspace, remaining = remaining.len(), "untiled window");

        if let Some(monitor) = self.monitor_for_workspace(host, workspace) {
            self.recalculate_monitor(host, monitor.id);
        }
    }
}
