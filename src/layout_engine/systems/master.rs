//! Master/stack tiling.
//!
//! Every workspace splits its windows into a master band and a stack. The
//! band's side is the workspace's [`MasterOrientation`]; masters share the band
//! and slaves share the rest, each weighted by their `perc_size`.

mod commands;
mod geometry;
mod insert;
mod node;
mod remove;
mod resize;

use std::sync::Arc;

pub use commands::FocusTarget;
pub use geometry::{arrange, effective_orientation};
pub use node::{MasterNode, NodeId, NodeStore};
use tracing::debug;

use crate::common::config::{MasterLayoutSettings, NewStatus};
use crate::layout_engine::{MasterOrientation, WorkspaceOrientations};
use crate::model::{LayoutHost, MonitorId, MonitorInfo, WindowId, WindowRef, WorkspaceId};
use crate::sys::geometry::Size;

pub struct MasterLayoutSystem {
    nodes: NodeStore,
    orientations: WorkspaceOrientations,
    settings: Arc<MasterLayoutSettings>,
    /// Set for the duration of one interactive resize step.
    suppress_animation: bool,
}

impl MasterLayoutSystem {
    pub fn new(settings: Arc<MasterLayoutSettings>) -> Self {
        Self {
            nodes: NodeStore::default(),
            orientations: WorkspaceOrientations::default(),
            settings,
            suppress_animation: false,
        }
    }

    pub fn settings(&self) -> &MasterLayoutSettings { &self.settings }

    /// Takes effect on the next layout pass.
    pub fn set_settings(&mut self, settings: Arc<MasterLayoutSettings>) { self.settings = settings; }

    pub fn nodes(&self) -> &NodeStore { &self.nodes }

    pub fn node_for(&self, window: WindowId) -> Option<&MasterNode> {
        self.nodes.find(window).map(|id| &self.nodes[id])
    }

    pub fn is_tiled(&self, window: WindowId) -> bool { self.nodes.find(window).is_some() }

    /// The stored orientation of `workspace`, if it has been laid out before.
    pub fn stored_orientation(&self, workspace: WorkspaceId) -> Option<MasterOrientation> {
        self.orientations.get(workspace)
    }

    /// Tiles every window in `windows` that the host still knows and that is not floating.
    pub fn enable(
        &mut self,
        host: &mut dyn LayoutHost,
        windows: impl IntoIterator<Item = WindowId>,
    ) {
        for window in windows {
            let Some(info) = host.window(window) else { continue };
            if info.floating {
                continue;
            }
            self.on_window_tiled(host, window);
        }
    }

    pub fn disable(&mut self) {
        debug!(nodes = self.nodes.len(), "disabling master layout");
        self.nodes.clear();
        self.orientations.clear();
    }

    pub fn on_workspace_removed(&mut self, workspace: WorkspaceId) {
        self.orientations.remove(workspace);
    }

    /// Points the node of `from` at `to`, keeping its place and role.
    pub fn replace_window(&mut self, host: &mut dyn LayoutHost, from: WindowId, to: WindowId) {
        let Some(id) = self.nodes.find(from) else { return };
        self.nodes[id].window = WindowRef::new(to);
        self.recalculate_window(host, to);
    }

    /// The size a window would get if it were tiled on `monitor` right now.
    pub fn predict_size_for_new_window(
        &self,
        host: &dyn LayoutHost,
        monitor: MonitorId,
    ) -> Option<Size> {
        let monitor = host.monitor(monitor)?;
        let workspace = monitor.active_special_workspace.or(monitor.active_workspace)?;
        let count = self.nodes.count_on_workspace(workspace);
        if count == 0 {
            return Some(monitor.frame.size);
        }
        let master = self.nodes.master_on_workspace(workspace)?;
        let master_size = self.nodes[master].size;
        if self.settings.new_status == NewStatus::Master {
            return Some(master_size);
        }
        let slaves = count - self.nodes.masters_on_workspace(workspace);
        Some(Size::new(
            monitor.frame.size.width - master_size.width,
            monitor.frame.size.height / (slaves + 1) as f64,
        ))
    }

    /// The workspace orientation, with the host's per-workspace rule taking
    /// precedence over the stored value.
    fn orientation_for(
        &mut self,
        host: &dyn LayoutHost,
        workspace: WorkspaceId,
    ) -> MasterOrientation {
        let stored = self.orientations.get_or_insert(workspace, self.settings.orientation);
        host.workspace(workspace)
            .and_then(|ws| ws.orientation_rule)
            .filter(|rule| !rule.trim().is_empty())
            .map_or(stored, |rule| MasterOrientation::from_rule(&rule))
    }

    fn monitor_for_workspace(
        &self,
        host: &dyn LayoutHost,
        workspace: WorkspaceId,
    ) -> Option<MonitorInfo> {
        host.workspace(workspace)?.monitor.and_then(|m| host.monitor(m))
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::testing::*;
    use super::*;
    use crate::model::{SimHost, WorkspaceInfo};
    use crate::sys::geometry::{Point, Rect};

    fn assert_role_bounds(layout: &MasterLayoutSystem, ws: WorkspaceId) {
        let count = layout.nodes().count_on_workspace(ws);
        let masters = layout.nodes().masters_on_workspace(ws);
        if count > 0 {
            assert!(masters >= 1 && masters <= count, "{masters} masters of {count}");
        }
        if count == 1 {
            assert_eq!(masters, 1);
        }
        let ratios: Vec<f64> = layout
            .nodes()
            .on_workspace(ws)
            .filter(|(_, n)| n.is_master)
            .map(|(_, n)| n.perc_master)
            .collect();
        assert!(ratios.windows(2).all(|pair| pair[0] == pair[1]), "{ratios:?}");
    }

    #[test]
    fn two_windows_split_by_mfact() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);

        assert_eq!(order(&layout, WS), vec![(1, true), (2, false)]);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
        assert_eq!(frame(&host, 2), Rect::from_parts(550.0, 0.0, 450.0, 800.0));
    }

    #[test]
    fn new_master_status_demotes_previous_master() {
        let mut host = host();
        let mut layout = layout_with(|s| s.new_status = NewStatus::Master);
        tile(&mut layout, &mut host, &[1, 2, 3]);

        assert_eq!(order(&layout, WS), vec![(1, false), (2, false), (3, true)]);
        assert_eq!(layout.nodes().masters_on_workspace(WS), 1);
        assert_eq!(frame(&host, 3), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
        assert_role_bounds(&layout, WS);
    }

    #[test]
    fn removing_the_only_master_promotes_the_next_slave() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);

        layout.on_window_untiled(&mut host, w(1));
        host.remove_window(w(1));

        assert_eq!(order(&layout, WS), vec![(2, true), (3, false)]);
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
        assert_eq!(frame(&host, 3), Rect::from_parts(550.0, 0.0, 450.0, 800.0));
    }

    #[test]
    fn centered_master_with_two_slaves() {
        let mut host = host();
        let mut layout = layout_with(|s| s.orientation = MasterOrientation::Center);
        tile(&mut layout, &mut host, &[1, 2, 3]);

        assert_eq!(frame(&host, 1), Rect::from_parts(225.0, 0.0, 550.0, 800.0));
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 0.0, 225.0, 800.0));
        assert_eq!(frame(&host, 3), Rect::from_parts(775.0, 0.0, 225.0, 800.0));
    }

    #[test]
    fn oversized_minimum_falls_back_to_floating() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1]);

        host.add_window(w(2), WS).unwrap().max_size = Some(Size::new(300.0, 800.0));
        layout.on_window_tiled(&mut host, w(2));

        assert_eq!(host.floated(), &[w(2)]);
        assert!(!layout.is_tiled(w(2)));
        assert_eq!(order(&layout, WS), vec![(1, true)]);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 1000.0, 800.0));
    }

    #[test]
    fn insert_then_remove_restores_order_and_roles() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        let before = order(&layout, WS);

        tile(&mut layout, &mut host, &[4]);
        layout.on_window_untiled(&mut host, w(4));
        host.remove_window(w(4));

        assert_eq!(order(&layout, WS), before);
    }

    #[test]
    fn single_window_fills_usable_area() {
        let mut host = host();
        host.monitor_mut(MON).unwrap().reserved_top_left = Point::new(0.0, 30.0);
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1]);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 30.0, 1000.0, 770.0));
    }

    #[test]
    fn single_window_keeps_master_column_when_asked() {
        let mut host = host();
        let mut layout = layout_with(|s| {
            s.always_keep_position = true;
            s.orientation = MasterOrientation::Right;
        });
        tile(&mut layout, &mut host, &[1]);
        assert_eq!(frame(&host, 1), Rect::from_parts(450.0, 0.0, 550.0, 800.0));
    }

    #[test]
    fn arbitrary_sequences_keep_role_bounds() {
        let mut host = host();
        let mut layout = layout_with(|s| s.new_status = NewStatus::Inherit);
        let mut alive: Vec<u64> = Vec::new();
        // Deterministic pseudo-random walk over tile/untile/addmaster/removemaster.
        let mut seed: u64 = 0x2545_f491;
        for step in 0..200u64 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            match seed % 4 {
                0 | 1 => {
                    let id = 100 + step;
                    host.add_window(w(id), WS).unwrap();
                    host.set_focus(alive.last().map(|&i| w(i)));
                    layout.on_window_tiled(&mut host, w(id));
                    alive.push(id);
                }
                2 if !alive.is_empty() => {
                    let id = alive.remove((seed as usize / 4) % alive.len());
                    layout.on_window_untiled(&mut host, w(id));
                    host.remove_window(w(id));
                }
                _ => {
                    if let Some(&id) = alive.first() {
                        if seed % 8 < 4 {
                            layout.add_master(&mut host, w(id));
                        } else {
                            layout.remove_master(&mut host, w(id));
                        }
                    }
                }
            }
            assert_role_bounds(&layout, WS);
            assert_eq!(layout.nodes().count_on_workspace(WS), alive.len());
        }
    }

    #[test]
    fn workspace_rule_overrides_stored_orientation() {
        let mut host = host();
        host.workspace_mut(WS).unwrap().orientation_rule = Some("top".into());
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 1000.0, 440.0));
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 440.0, 1000.0, 360.0));
        assert_eq!(layout.stored_orientation(WS), Some(MasterOrientation::Left));
    }

    #[test]
    fn predicted_sizes() {
        let mut host = host();
        let mut layout = layout();
        assert_eq!(
            layout.predict_size_for_new_window(&host, MON),
            Some(Size::new(1000.0, 800.0))
        );
        tile(&mut layout, &mut host, &[1, 2]);
        assert_eq!(
            layout.predict_size_for_new_window(&host, MON),
            Some(Size::new(450.0, 400.0))
        );
    }

    #[test]
    fn replaced_window_takes_over_the_tile() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);
        host.add_window(w(9), WS).unwrap();
        layout.replace_window(&mut host, w(2), w(9));
        assert!(!layout.is_tiled(w(2)));
        assert_eq!(frame(&host, 9), Rect::from_parts(550.0, 0.0, 450.0, 800.0));
    }

    #[test]
    fn enable_tiles_existing_windows_and_disable_forgets_them() {
        let mut host = host();
        host.add_window(w(1), WS).unwrap();
        host.add_window(w(2), WS).unwrap().floating = true;
        host.add_window(w(3), WS).unwrap();
        let mut layout = layout();
        layout.enable(&mut host, [w(1), w(2), w(3)]);
        assert_eq!(order(&layout, WS), vec![(1, true), (3, false)]);
        layout.disable();
        assert!(layout.nodes().is_empty());
        assert_eq!(layout.stored_orientation(WS), None);
    }

    #[test]
    fn special_workspace_is_laid_out_on_top_and_scaled() {
        let mut host: SimHost = host();
        let special = WorkspaceId::new(-98);
        host.add_special_workspace(special, MON).unwrap();
        let mut layout = layout_with(|s| s.special_scale_factor = 0.5);
        host.add_window(w(1), special).unwrap();
        layout.on_window_tiled(&mut host, w(1));
        assert_eq!(frame(&host, 1), Rect::from_parts(250.0, 200.0, 500.0, 400.0));
        let info: WorkspaceInfo = crate::model::LayoutHost::workspace(&host, special).unwrap();
        assert!(info.is_special);
    }

    #[test]
    fn monitor_without_active_workspace_is_not_laid_out() {
        let mut host = SimHost::new();
        host.add_monitor(MON, Rect::from_parts(0.0, 0.0, 1000.0, 800.0));
        let special = WorkspaceId::new(-98);
        host.add_special_workspace(special, MON).unwrap();
        host.add_window(w(1), special).unwrap();

        let mut layout = layout();
        layout.on_window_tiled(&mut host, w(1));
        assert!(layout.is_tiled(w(1)));
        assert!(host.applied().is_empty());

        host.add_workspace(WS, MON).unwrap();
        layout.recalculate_monitor(&mut host, MON);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 1000.0, 800.0));
    }
}
