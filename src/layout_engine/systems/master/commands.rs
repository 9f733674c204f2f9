use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};

use super::{MasterLayoutSystem, MasterNode, NodeId};
use crate::common::config::{MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};
use crate::layout_engine::{MasterOrientation, ResizeMode};
use crate::model::{FullscreenMode, LayoutHost, WindowId, WorkspaceId};

/// Which window keeps focus after `swapwithmaster` or `focusmaster`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FocusTarget {
    /// Focus follows the window that was acted on.
    #[default]
    Auto,
    Master,
    Child,
}

impl MasterLayoutSystem {
    /// Lays out `window` for a new fullscreen mode the host has already recorded.
    pub fn on_fullscreen_requested(
        &mut self,
        host: &mut dyn LayoutHost,
        window: WindowId,
        from: FullscreenMode,
        to: FullscreenMode,
    ) {
        let Some(info) = host.window(window) else { return };
        debug!(?window, %from, %to, "fullscreen requested");
        if to == FullscreenMode::None {
            if let Some(id) = self.nodes.find(window) {
                let node = self.nodes[id].clone();
                self.apply_node(host, &node);
            }
            return;
        }
        let Some(monitor) = host.monitor(info.monitor) else { return };
        self.apply_fullscreen(host, window, info.workspace, to, &monitor);
    }

    /// Exchanges the windows held by two nodes, moving them between
    /// workspaces when the nodes live on different ones.
    pub fn switch_windows(&mut self, host: &mut dyn LayoutHost, a: WindowId, b: WindowId) {
        let (Some(na), Some(nb)) = (self.nodes.find(a), self.nodes.find(b)) else { return };
        let (ws_a, ws_b) = (self.nodes[na].workspace, self.nodes[nb].workspace);
        if ws_a != ws_b {
            host.move_window_to_workspace(a, ws_b);
            host.move_window_to_workspace(b, ws_a);
        }
        self.nodes.swap_windows(na, nb);

        self.recalculate_workspace_monitor(host, ws_b);
        if ws_a != ws_b {
            self.recalculate_workspace_monitor(host, ws_a);
        }
    }

    /// The window `cyclenext`/`cycleprev` moves to from `window`.
    ///
    /// Windows of the same role come first; once they run out the walk
    /// continues into the other role. Without `looping`, stepping forward
    /// onto a master or backward from a master onto a slave yields nothing.
    pub fn next_window(&self, window: WindowId, forward: bool, looping: bool) -> Option<WindowId> {
        let id = self.nodes.find(window)?;
        let current = &self.nodes[id];
        let mut order: Vec<(NodeId, &MasterNode)> = self.nodes.iter().collect();
        if !forward {
            order.reverse();
        }
        let at = order.iter().position(|(n, _)| *n == id)?;
        let peer = |n: &NodeId, node: &MasterNode| *n != id && node.workspace == current.workspace;

        let same_role = |(n, node): &&(NodeId, &MasterNode)| {
            peer(n, node) && node.is_master == current.is_master
        };
        let other_role = |(n, node): &&(NodeId, &MasterNode)| {
            peer(n, node) && node.is_master != current.is_master
        };
        let candidate = order[at..]
            .iter()
            .find(same_role)
            .or_else(|| order.iter().find(other_role))
            .map(|(_, node)| *node)?;

        if !looping {
            if candidate.is_master && forward {
                return None;
            }
            if !candidate.is_master && current.is_master && !forward {
                return None;
            }
        }
        Some(candidate.key())
    }

    pub fn swap_with_master(
        &mut self,
        host: &mut dyn LayoutHost,
        window: WindowId,
        focus: FocusTarget,
    ) {
        let Some(id) = self.nodes.find(window) else { return };
        let workspace = self.nodes[id].workspace;
        let Some(master) = self.nodes.master_on_workspace(workspace) else { return };
        let old_master = self.nodes[master].key();

        if old_master != window {
            self.switch_windows(host, window, old_master);
            let target = if focus == FocusTarget::Child { old_master } else { window };
            self.switch_to_window(host, window, Some(target));
        } else if let Some(slave) = self.nodes.first_slave_on_workspace(workspace) {
            let new_master = self.nodes[slave].key();
            self.switch_windows(host, new_master, old_master);
            let target = if focus == FocusTarget::Master { new_master } else { old_master };
            self.switch_to_window(host, window, Some(target));
        }
    }

    /// Focuses the master, or the first slave when the master already has
    /// focus and `focus` is not [`FocusTarget::Master`].
    pub fn focus_master(&mut self, host: &mut dyn LayoutHost, window: WindowId, focus: FocusTarget) {
        let Some(info) = host.window(window) else { return };
        let Some(master) = self.nodes.master_on_workspace(info.workspace) else { return };
        let master_window = self.nodes[master].key();
        if master_window != window {
            self.switch_to_window(host, window, Some(master_window));
        } else if focus != FocusTarget::Master {
            let slave =
                self.nodes.first_slave_on_workspace(info.workspace).map(|n| self.nodes[n].key());
            self.switch_to_window(host, window, slave);
        }
    }

    pub fn cycle(&mut self, host: &mut dyn LayoutHost, window: WindowId, forward: bool, looping: bool) {
        let target = self.next_window(window, forward, looping);
        self.switch_to_window(host, window, target);
    }

    /// Swaps `window` with the one `cycle` would move to and keeps focus on it.
    pub fn swap(&mut self, host: &mut dyn LayoutHost, window: WindowId, forward: bool, looping: bool) {
        let Some(info) = host.window(window) else { return };
        if info.floating {
            return;
        }
        let Some(other) = self.next_window(window, forward, looping) else { return };
        self.unset_fullscreen(host, window);
        self.switch_windows(host, window, other);
        self.switch_to_window(host, window, Some(window));
    }

    /// Promotes `window`, or the first slave when `window` already is a master.
    pub fn add_master(&mut self, host: &mut dyn LayoutHost, window: WindowId) {
        let Some(info) = host.window(window) else { return };
        if info.floating {
            return;
        }
        let workspace = info.workspace;
        let windows = self.nodes.count_on_workspace(workspace);
        let masters = self.nodes.masters_on_workspace(workspace);
        if masters + 2 > windows && !self.settings.allow_small_split {
            return;
        }
        self.unset_fullscreen(host, window);

        let target = match self.nodes.find(window) {
            Some(id) if !self.nodes[id].is_master => Some(id),
            _ => self.nodes.first_slave_on_workspace(workspace),
        };
        if let Some(target) = target {
            if let Some(master) = self.nodes.master_on_workspace(workspace) {
                self.nodes[target].perc_master = self.nodes[master].perc_master;
            }
            self.nodes[target].is_master = true;
            info!(window = ?self.nodes[target].key(), "added master");
        }
        self.recalculate_monitor(host, info.monitor);
    }

    /// Demotes `window`, or the last master when `window` is not one.
    pub fn remove_master(&mut self, host: &mut dyn LayoutHost, window: WindowId) {
        let Some(info) = host.window(window) else { return };
        if info.floating {
            return;
        }
        let workspace = info.workspace;
        let windows = self.nodes.count_on_workspace(workspace);
        let masters = self.nodes.masters_on_workspace(workspace);
        if windows < 2 || masters < 2 {
            return;
        }
        self.unset_fullscreen(host, window);

        let target = match self.nodes.find(window) {
            Some(id) if self.nodes[id].is_master => Some(id),
            _ => self
                .nodes
                .on_workspace(workspace)
                .filter(|(_, n)| n.is_master)
                .map(|(id, _)| id)
                .next_back(),
        };
        if let Some(target) = target {
            self.nodes[target].is_master = false;
            info!(window = ?self.nodes[target].key(), "removed master");
        }
        self.recalculate_monitor(host, info.monitor);
    }

    pub fn set_orientation(
        &mut self,
        host: &mut dyn LayoutHost,
        window: WindowId,
        orientation: MasterOrientation,
    ) {
        let Some(info) = host.window(window) else { return };
        self.unset_fullscreen(host, window);
        self.orientations.set(info.workspace, orientation);
        info!(workspace = ?info.workspace, %orientation, "set orientation");
        self.recalculate_monitor(host, info.monitor);
    }

    /// Steps the workspace orientation of `window` through `cycle`, or through
    /// [`MasterOrientation::default_cycle`] when `cycle` is empty.
    pub fn cycle_orientation(
        &mut self,
        host: &mut dyn LayoutHost,
        window: WindowId,
        cycle: &[MasterOrientation],
        step: isize,
    ) {
        let Some(info) = host.window(window) else { return };
        let default_cycle;
        let cycle = if cycle.is_empty() {
            default_cycle = MasterOrientation::default_cycle();
            &default_cycle[..]
        } else {
            cycle
        };
        let current = self.orientations.get_or_insert(info.workspace, self.settings.orientation);
        self.set_orientation(host, window, current.step_in(cycle, step));
    }

    /// Changes the master share of the workspace of `window`.
    pub fn alter_split_ratio(
        &mut self,
        host: &mut dyn LayoutHost,
        window: WindowId,
        value: f64,
        mode: ResizeMode,
    ) {
        let Some(id) = self.nodes.find(window) else { return };
        let workspace = self.nodes[id].workspace;
        let Some(master) = self.nodes.master_on_workspace(workspace) else { return };
        let ratio = mode.apply(self.nodes[master].perc_master, value);
        let ratio = ratio.max(MIN_SPLIT_RATIO).min(MAX_SPLIT_RATIO);
        for other in self.nodes.ids_on(workspace) {
            if self.nodes[other].is_master {
                self.nodes[other].perc_master = ratio;
            }
        }
        info!(?workspace, ratio, "altered split ratio");
        self.recalculate_workspace_monitor(host, workspace);
    }

    /// Rotates the workspace of `window`: the first (or last) slave becomes the
    /// master and the old master moves to the far end of the stack.
    pub fn roll(&mut self, host: &mut dyn LayoutHost, window: WindowId, forward: bool) {
        let Some(id) = self.nodes.find(window) else { return };
        let workspace = self.nodes[id].workspace;
        let old_master = if self.nodes[id].is_master {
            Some(id)
        } else {
            self.nodes.master_on_workspace(workspace)
        };
        let Some(old_master) = old_master else { return };

        let slaves: Vec<NodeId> = self
            .nodes
            .on_workspace(workspace)
            .filter(|(_, n)| !n.is_master)
            .map(|(n, _)| n)
            .collect();
        let new_master = if forward { slaves.first() } else { slaves.last() }.copied();
        if let Some(new_master) = new_master {
            self.nodes[new_master].is_master = true;
            self.nodes[new_master].perc_master = self.nodes[old_master].perc_master;
            self.nodes.move_before(new_master, Some(old_master));
            let target = self.nodes[new_master].key();
            self.switch_to_window(host, window, Some(target));

            self.nodes[old_master].is_master = false;
            if forward {
                self.nodes.move_before(old_master, None);
            } else {
                self.nodes.move_to_front(old_master);
            }
        }
        self.recalculate_workspace_monitor(host, workspace);
    }

    /// Moves focus from `current` to `target`. Leaving a fullscreen window
    /// drops its fullscreen state, and hands it to `target` when
    /// `inherit_fullscreen` is set.
    fn switch_to_window(
        &mut self,
        host: &mut dyn LayoutHost,
        current: WindowId,
        target: Option<WindowId>,
    ) {
        let Some(target) = target.and_then(|t| host.window(t)) else { return };
        let mode = host.window(current).map(|c| c.fullscreen).unwrap_or_default();
        if mode.is_active() {
            host.set_fullscreen_mode(current, FullscreenMode::None);
            host.request_focus(target.id);
            if self.settings.inherit_fullscreen {
                host.set_fullscreen_mode(target.id, mode);
            }
            self.recalculate_workspace_monitor(host, target.workspace);
        } else {
            host.request_focus(target.id);
            host.warp_cursor(target.frame.mid());
        }
    }

    fn unset_fullscreen(&self, host: &mut dyn LayoutHost, window: WindowId) {
        if host.window(window).is_some_and(|info| info.fullscreen.is_active()) {
            host.set_fullscreen_mode(window, FullscreenMode::None);
        }
    }

    fn recalculate_workspace_monitor(&mut self, host: &mut dyn LayoutHost, workspace: WorkspaceId) {
        if let Some(monitor) = self.monitor_for_workspace(host, workspace) {
            self.recalculate_monitor(host, monitor.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::super::testing::*;
    use super::*;
    use crate::model::{MonitorId, SimHost};
    use crate::sys::geometry::{Point, Rect};

    #[test]
    fn swap_with_master_focuses_the_new_master_by_default() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.swap_with_master(&mut host, w(3), FocusTarget::Auto);

        assert_eq!(order(&layout, WS), vec![(3, true), (2, false), (1, false)]);
        assert_eq!(frame(&host, 3), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
        assert_eq!(host.focused_window(), Some(w(3)));
        assert_eq!(host.warps().last(), Some(&Point::new(275.0, 400.0)));
    }

    #[test]
    fn swap_with_master_can_follow_the_child() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.swap_with_master(&mut host, w(3), FocusTarget::Child);
        assert_eq!(host.focused_window(), Some(w(1)));
    }

    #[test]
    fn swap_from_the_master_trades_with_the_first_slave() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.swap_with_master(&mut host, w(1), FocusTarget::Auto);
        assert_eq!(order(&layout, WS), vec![(2, true), (1, false), (3, false)]);
        assert_eq!(host.focused_window(), Some(w(1)));

        layout.swap_with_master(&mut host, w(2), FocusTarget::Master);
        assert_eq!(order(&layout, WS), vec![(1, true), (2, false), (3, false)]);
        assert_eq!(host.focused_window(), Some(w(1)));
    }

    #[test]
    fn focus_master_toggles_between_master_and_first_slave() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.focus_master(&mut host, w(3), FocusTarget::Auto);
        assert_eq!(host.focused_window(), Some(w(1)));
        layout.focus_master(&mut host, w(1), FocusTarget::Auto);
        assert_eq!(host.focused_window(), Some(w(2)));

        host.set_focus(Some(w(1)));
        layout.focus_master(&mut host, w(1), FocusTarget::Master);
        assert_eq!(host.focused_window(), Some(w(1)));
    }

    #[test]
    fn next_window_walks_roles_and_respects_noloop() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);

        assert_eq!(layout.next_window(w(1), true, true), Some(w(2)));
        assert_eq!(layout.next_window(w(2), true, true), Some(w(3)));
        assert_eq!(layout.next_window(w(3), true, true), Some(w(1)));
        assert_eq!(layout.next_window(w(3), true, false), None);
        assert_eq!(layout.next_window(w(2), false, true), Some(w(1)));
        assert_eq!(layout.next_window(w(1), false, true), Some(w(3)));
        assert_eq!(layout.next_window(w(1), false, false), None);
        assert_eq!(layout.next_window(w(9), true, true), None);
    }

    #[test]
    fn lone_window_has_no_neighbour() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1]);
        assert_eq!(layout.next_window(w(1), true, true), None);
        host.set_focus(Some(w(1)));
        layout.cycle(&mut host, w(1), true, true);
        assert_eq!(host.focused_window(), Some(w(1)));
        assert!(host.warps().is_empty());
    }

    #[test]
    fn cycling_out_of_fullscreen_hands_it_over() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);
        host.set_fullscreen_mode(w(1), FullscreenMode::Fullscreen);
        layout.cycle(&mut host, w(1), true, true);

        assert_eq!(host.focused_window(), Some(w(2)));
        assert_eq!(host.window(w(1)).unwrap().fullscreen, FullscreenMode::None);
        assert_eq!(host.window(w(2)).unwrap().fullscreen, FullscreenMode::Fullscreen);
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 0.0, 1000.0, 800.0));
    }

    #[test]
    fn cycling_out_of_fullscreen_without_inheritance() {
        let mut host = host();
        let mut layout = layout_with(|s| s.inherit_fullscreen = false);
        tile(&mut layout, &mut host, &[1, 2]);
        host.set_fullscreen_mode(w(1), FullscreenMode::Maximized);
        layout.cycle(&mut host, w(1), true, true);

        assert_eq!(host.focused_window(), Some(w(2)));
        assert_eq!(host.window(w(2)).unwrap().fullscreen, FullscreenMode::None);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
    }

    #[test]
    fn swap_next_moves_the_window_and_keeps_focus() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.swap(&mut host, w(1), true, true);

        assert_eq!(order(&layout, WS), vec![(2, true), (1, false), (3, false)]);
        assert_eq!(frame(&host, 1), Rect::from_parts(550.0, 0.0, 450.0, 400.0));
        assert_eq!(host.focused_window(), Some(w(1)));

        layout.swap(&mut host, w(3), true, false);
        assert_eq!(order(&layout, WS), vec![(2, true), (1, false), (3, false)]);
    }

    #[test]
    fn add_and_remove_master() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);

        layout.add_master(&mut host, w(3));
        assert_eq!(order(&layout, WS), vec![(1, true), (2, false), (3, true)]);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 550.0, 400.0));
        assert_eq!(frame(&host, 3), Rect::from_parts(0.0, 400.0, 550.0, 400.0));
        assert_eq!(frame(&host, 2), Rect::from_parts(550.0, 0.0, 450.0, 800.0));

        // A stack must keep at least one window.
        layout.add_master(&mut host, w(2));
        assert_eq!(layout.nodes().masters_on_workspace(WS), 2);

        layout.remove_master(&mut host, w(1));
        assert_eq!(order(&layout, WS), vec![(1, false), (2, false), (3, true)]);

        // The last master cannot be removed.
        layout.remove_master(&mut host, w(3));
        assert_eq!(layout.nodes().masters_on_workspace(WS), 1);
    }

    #[test]
    fn add_master_from_a_master_promotes_the_first_slave() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3, 4]);
        layout.alter_split_ratio(&mut host, w(1), 0.6, ResizeMode::Exact);
        layout.add_master(&mut host, w(1));
        assert_eq!(order(&layout, WS), vec![(1, true), (2, true), (3, false), (4, false)]);
        assert_eq!(layout.node_for(w(2)).unwrap().perc_master, 0.6);

        layout.remove_master(&mut host, w(4));
        assert_eq!(order(&layout, WS), vec![(1, true), (2, false), (3, false), (4, false)]);
    }

    #[test]
    fn small_split_allows_all_masters() {
        let mut host = host();
        let mut layout = layout_with(|s| s.allow_small_split = true);
        tile(&mut layout, &mut host, &[1, 2]);
        layout.add_master(&mut host, w(2));
        assert_eq!(order(&layout, WS), vec![(1, true), (2, true)]);
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 400.0, 1000.0, 400.0));
    }

    #[test]
    fn orientation_commands() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);
        layout.set_orientation(&mut host, w(1), MasterOrientation::Top);
        assert_eq!(layout.stored_orientation(WS), Some(MasterOrientation::Top));
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 1000.0, 440.0));
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 440.0, 1000.0, 360.0));

        layout.set_orientation(&mut host, w(2), MasterOrientation::Right);
        assert_eq!(frame(&host, 1), Rect::from_parts(450.0, 0.0, 550.0, 800.0));
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 0.0, 450.0, 800.0));
    }

    #[test]
    fn default_orientation_cycle_returns_home_after_five_steps() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1]);
        let mut seen = Vec::new();
        for _ in 0..5 {
            layout.cycle_orientation(&mut host, w(1), &[], 1);
            seen.push(layout.stored_orientation(WS).unwrap());
        }
        assert_eq!(seen, vec![
            MasterOrientation::Top,
            MasterOrientation::Right,
            MasterOrientation::Bottom,
            MasterOrientation::Center,
            MasterOrientation::Left,
        ]);

        layout.cycle_orientation(&mut host, w(1), &[], -1);
        assert_eq!(layout.stored_orientation(WS), Some(MasterOrientation::Center));
    }

    #[test]
    fn custom_orientation_cycle() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);
        let cycle = [MasterOrientation::Right, MasterOrientation::Left];
        layout.cycle_orientation(&mut host, w(1), &cycle, 1);
        assert_eq!(layout.stored_orientation(WS), Some(MasterOrientation::Right));
        layout.cycle_orientation(&mut host, w(1), &cycle, 1);
        assert_eq!(layout.stored_orientation(WS), Some(MasterOrientation::Left));

        layout.set_orientation(&mut host, w(1), MasterOrientation::Top);
        layout.cycle_orientation(&mut host, w(1), &cycle, 1);
        assert_eq!(layout.stored_orientation(WS), Some(MasterOrientation::Right));
    }

    #[test]
    fn split_ratio_is_clamped_and_shared_by_masters() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);

        layout.alter_split_ratio(&mut host, w(2), 0.1, ResizeMode::Relative);
        assert!((layout.node_for(w(1)).unwrap().perc_master - 0.65).abs() < 1e-9);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 650.0, 800.0));

        layout.alter_split_ratio(&mut host, w(2), 2.0, ResizeMode::Exact);
        assert_eq!(layout.node_for(w(1)).unwrap().perc_master, 0.95);

        layout.alter_split_ratio(&mut host, w(1), 0.3, ResizeMode::Exact);
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 300.0, 800.0));
    }

    #[test]
    fn roll_next_rotates_the_stack_forward() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.roll(&mut host, w(1), true);
        assert_eq!(order(&layout, WS), vec![(2, true), (3, false), (1, false)]);
        assert_eq!(host.focused_window(), Some(w(2)));
        assert_eq!(frame(&host, 2), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
        assert_eq!(frame(&host, 1), Rect::from_parts(550.0, 400.0, 450.0, 400.0));
    }

    #[test]
    fn roll_prev_rotates_the_stack_backward() {
        let mut host = host();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2, 3]);
        layout.roll(&mut host, w(2), false);
        assert_eq!(order(&layout, WS), vec![(1, false), (3, true), (2, false)]);
        assert_eq!(host.focused_window(), Some(w(3)));
        assert_eq!(frame(&host, 3), Rect::from_parts(0.0, 0.0, 550.0, 800.0));
        assert_eq!(frame(&host, 1), Rect::from_parts(550.0, 0.0, 450.0, 400.0));
    }

    #[test]
    fn switching_windows_across_workspaces_moves_them() {
        let mut host: SimHost = host();
        let other_mon = MonitorId::new(1);
        let other_ws = WorkspaceId::new(2);
        host.add_monitor(other_mon, Rect::from_parts(1000.0, 0.0, 1000.0, 800.0));
        host.add_workspace(other_ws, other_mon).unwrap();
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1]);
        host.add_window(w(5), other_ws).unwrap();
        layout.on_window_tiled(&mut host, w(5));

        layout.switch_windows(&mut host, w(1), w(5));
        assert_eq!(host.window(w(1)).unwrap().workspace, other_ws);
        assert_eq!(host.window(w(5)).unwrap().workspace, WS);
        assert_eq!(frame(&host, 1), Rect::from_parts(1000.0, 0.0, 1000.0, 800.0));
        assert_eq!(frame(&host, 5), Rect::from_parts(0.0, 0.0, 1000.0, 800.0));
        assert_eq!(layout.node_for(w(5)).unwrap().workspace, WS);
    }

    #[test]
    fn fullscreen_requests_lay_out_the_window() {
        let mut host = host();
        host.monitor_mut(MON).unwrap().reserved_top_left = Point::new(0.0, 30.0);
        let mut layout = layout();
        tile(&mut layout, &mut host, &[1, 2]);

        host.set_fullscreen_mode(w(1), FullscreenMode::Fullscreen);
        layout.on_fullscreen_requested(
            &mut host,
            w(1),
            FullscreenMode::None,
            FullscreenMode::Fullscreen,
        );
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 0.0, 1000.0, 800.0));

        host.set_fullscreen_mode(w(1), FullscreenMode::Maximized);
        layout.on_fullscreen_requested(
            &mut host,
            w(1),
            FullscreenMode::Fullscreen,
            FullscreenMode::Maximized,
        );
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 30.0, 1000.0, 770.0));

        host.set_fullscreen_mode(w(1), FullscreenMode::None);
        layout.on_fullscreen_requested(
            &mut host,
            w(1),
            FullscreenMode::Maximized,
            FullscreenMode::None,
        );
        assert_eq!(frame(&host, 1), Rect::from_parts(0.0, 30.0, 550.0, 770.0));
    }
}
