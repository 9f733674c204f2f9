use tracing::{debug, trace};

use super::{MasterLayoutSystem, MasterNode};
use crate::common::config::{CenterFallback, MasterLayoutSettings};
use crate::layout_engine::MasterOrientation;
use crate::layout_engine::utils::finish_frame;
use crate::model::{FullscreenMode, LayoutHost, MonitorId, MonitorInfo, WindowId, WorkspaceId};
use crate::sys::geometry::{Point, Size};

/// While more than one node is left to place, a node may take at most this
/// share of the remaining extent.
const MAX_SHARE_OF_REMAINING: f64 = 0.9;

/// Resolves `Center` to its fallback while there are too few slaves to flank
/// the master. The flag is true when the layout is actually centered.
pub fn effective_orientation(
    orientation: MasterOrientation,
    slaves: usize,
    settings: &MasterLayoutSettings,
) -> (MasterOrientation, bool) {
    match orientation {
        MasterOrientation::Center if slaves >= settings.slave_count_for_center_master => {
            (MasterOrientation::Center, true)
        }
        MasterOrientation::Center => (settings.center_master_fallback.orientation(), false),
        other => (other, false),
    }
}

/// Splits `total` between the nodes at `members`, in order, by their `perc_size`.
///
/// Smart mode first rescales the weights so that the nodes exactly fill
/// `total`. Otherwise every node but the last takes its weighted share of
/// what is left, capped so the nodes after it are not starved.
fn distribute(total: f64, nodes: &mut [MasterNode], members: &[usize], smart: bool) -> Vec<f64> {
    let count = members.len();
    if count == 0 {
        return Vec::new();
    }
    if smart {
        let average = total / count as f64;
        let accumulated: f64 = members.iter().map(|&i| average * nodes[i].perc_size).sum();
        let scale = total / accumulated;
        for &i in members {
            nodes[i].perc_size = if scale.is_finite() { nodes[i].perc_size * scale } else { 1.0 };
        }
        return members.iter().map(|&i| average * nodes[i].perc_size).collect();
    }
    let mut left = total;
    members
        .iter()
        .enumerate()
        .map(|(placed, &i)| {
            let remaining = count - placed;
            let mut extent = left;
            if remaining > 1 {
                extent = (left / remaining as f64 * nodes[i].perc_size)
                    .min(left * MAX_SHARE_OF_REMAINING);
            }
            left -= extent;
            extent
        })
        .collect()
}

/// Computes the tile of every node of one workspace, given in store order.
///
/// Only `position`, `size` and (in smart mode) `perc_size` are written.
/// Returns false, leaving the nodes untouched, when there is no master.
pub fn arrange(
    monitor: &MonitorInfo,
    orientation: MasterOrientation,
    settings: &MasterLayoutSettings,
    nodes: &mut [MasterNode],
) -> bool {
    let Some(first_master) = nodes.iter().position(|n| n.is_master) else {
        return false;
    };
    let masters: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].is_master).collect();
    let slaves: Vec<usize> = (0..nodes.len()).filter(|&i| !nodes[i].is_master).collect();
    let (orientation, centered) = effective_orientation(orientation, slaves.len(), settings);

    let usable = monitor.usable_area();
    let (ws_pos, ws_size) = (usable.origin, usable.size);
    let perc = nodes[first_master].perc_master;
    let smart = settings.smart_resizing;
    let ignore_reserved = centered && settings.center_ignores_reserved;

    if nodes.len() == 1 && !centered {
        let node = &mut nodes[0];
        if settings.always_keep_position {
            let width = ws_size.width * perc;
            let x = match orientation {
                MasterOrientation::Right => ws_size.width - width,
                MasterOrientation::Center => (ws_size.width - width) / 2.0,
                _ => 0.0,
            };
            node.position = ws_pos + Point::new(x, 0.0);
            node.size = Size::new(width, ws_size.height);
        } else {
            node.position = ws_pos;
            node.size = ws_size;
        }
        return true;
    }

    match orientation {
        MasterOrientation::Top | MasterOrientation::Bottom => {
            let height =
                if slaves.is_empty() { ws_size.height } else { ws_size.height * perc };
            let y = if orientation == MasterOrientation::Bottom {
                ws_size.height - height
            } else {
                0.0
            };
            let widths = distribute(ws_size.width, nodes, &masters, smart);
            let mut x = 0.0;
            for (&i, width) in masters.iter().zip(widths) {
                nodes[i].position = ws_pos + Point::new(x, y);
                nodes[i].size = Size::new(width, height);
                x += width;
            }
        }
        MasterOrientation::Left | MasterOrientation::Right | MasterOrientation::Center => {
            let base = if ignore_reserved { monitor.frame.size.width } else { ws_size.width };
            let width = if !slaves.is_empty() || centered { base * perc } else { base };
            let x = if orientation == MasterOrientation::Right {
                ws_size.width - width
            } else if centered {
                (base - width) / 2.0
            } else {
                0.0
            };
            let origin = if ignore_reserved { monitor.frame.origin } else { ws_pos };
            let heights = distribute(ws_size.height, nodes, &masters, smart);
            let mut y = 0.0;
            for (&i, height) in masters.iter().zip(heights) {
                nodes[i].position = origin + Point::new(x, y);
                nodes[i].size = Size::new(width, height);
                y += height;
            }
        }
    }

    if slaves.is_empty() {
        return true;
    }
    let master_size = nodes[first_master].size;

    match orientation {
        MasterOrientation::Top | MasterOrientation::Bottom => {
            let height = ws_size.height - master_size.height;
            let y = if orientation == MasterOrientation::Top { master_size.height } else { 0.0 };
            let widths = distribute(ws_size.width, nodes, &slaves, smart);
            let mut x = 0.0;
            for (&i, width) in slaves.iter().zip(widths) {
                nodes[i].position = ws_pos + Point::new(x, y);
                nodes[i].size = Size::new(width, height);
                x += width;
            }
        }
        MasterOrientation::Left | MasterOrientation::Right => {
            let width = ws_size.width - master_size.width;
            let x = if orientation == MasterOrientation::Left { master_size.width } else { 0.0 };
            let heights = distribute(ws_size.height, nodes, &slaves, smart);
            let mut y = 0.0;
            for (&i, height) in slaves.iter().zip(heights) {
                nodes[i].position = ws_pos + Point::new(x, y);
                nodes[i].size = Size::new(width, height);
                y += height;
            }
        }
        MasterOrientation::Center => {
            let base = if ignore_reserved { monitor.frame.size.width } else { ws_size.width };
            let column_width = (base - master_size.width) / 2.0;
            // Slaves alternate sides starting on the fallback side, which
            // therefore holds the odd one out.
            let mut on_right = settings.center_master_fallback == CenterFallback::Right;
            let (mut left, mut right) = (Vec::new(), Vec::new());
            for &i in &slaves {
                if on_right { right.push(i) } else { left.push(i) }
                on_right = !on_right;
            }
            for (column, is_right) in [(left, false), (right, true)] {
                let x = match (is_right, ignore_reserved) {
                    (false, _) => 0.0,
                    (true, false) => column_width + master_size.width,
                    (true, true) => {
                        column_width + master_size.width - monitor.reserved_top_left.x
                    }
                };
                let width = match (is_right, ignore_reserved) {
                    (_, false) => column_width,
                    (false, true) => column_width - monitor.reserved_top_left.x,
                    (true, true) => column_width - monitor.reserved_bottom_right.x,
                };
                let heights = distribute(ws_size.height, nodes, &column, smart);
                let mut y = 0.0;
                for (&i, height) in column.iter().zip(heights) {
                    nodes[i].position = ws_pos + Point::new(x, y);
                    nodes[i].size = Size::new(width, height);
                    y += height;
                }
            }
        }
    }
    true
}

impl MasterLayoutSystem {
    /// Lays out the special workspace shown on `monitor`, if any, then its
    /// active workspace. A monitor without an active workspace is left alone.
    pub fn recalculate_monitor(&mut self, host: &mut dyn LayoutHost, monitor: MonitorId) {
        let Some(info) = host.monitor(monitor) else { return };
        let Some(active) = info.active_workspace else { return };
        if let Some(special) = info.active_special_workspace {
            self.calculate_workspace(host, special);
        }
        self.calculate_workspace(host, active);
    }

    pub fn recalculate_window(&mut self, host: &mut dyn LayoutHost, window: WindowId) {
        let Some(id) = self.nodes.find(window) else { return };
        let workspace = self.nodes[id].workspace;
        if let Some(monitor) = self.monitor_for_workspace(host, workspace) {
            self.recalculate_monitor(host, monitor.id);
        }
    }

    pub(super) fn calculate_workspace(&mut self, host: &mut dyn LayoutHost, workspace: WorkspaceId) {
        let Some(ws) = host.workspace(workspace) else { return };
        let Some(monitor) = ws.monitor.and_then(|m| host.monitor(m)) else { return };

        if let Some((window, mode)) = ws.fullscreen.filter(|(_, mode)| mode.is_active()) {
            self.apply_fullscreen(host, window, workspace, mode, &monitor);
            return;
        }

        let orientation = self.orientation_for(host, workspace);
        let ids = self.nodes.ids_on(workspace);
        let mut group: Vec<MasterNode> = ids.iter().map(|&id| self.nodes[id].clone()).collect();
        if !arrange(&monitor, orientation, &self.settings, &mut group) {
            return;
        }
        debug!(?workspace, %orientation, nodes = group.len(), "laid out workspace");

        for (&id, node) in ids.iter().zip(group) {
            self.nodes[id] = node;
        }
        for masters_first in [true, false] {
            for &id in &ids {
                if self.nodes[id].is_master == masters_first {
                    self.apply_node(host, &self.nodes[id]);
                }
            }
        }
    }

    pub(super) fn apply_fullscreen(
        &self,
        host: &mut dyn LayoutHost,
        window: WindowId,
        workspace: WorkspaceId,
        mode: FullscreenMode,
        monitor: &MonitorInfo,
    ) {
        match mode {
            FullscreenMode::Fullscreen => {
                host.apply_geometry(window, monitor.frame, self.suppress_animation)
            }
            FullscreenMode::Maximized => {
                let node = MasterNode::synthetic(window, workspace, monitor.usable_area());
                self.apply_node(host, &node);
            }
            FullscreenMode::None => {}
        }
    }

    /// Sends a node's tile to its window, after gaps and scaling.
    pub(super) fn apply_node(&self, host: &mut dyn LayoutHost, node: &MasterNode) {
        let Some(window) = node.window.resolve(host) else {
            trace!(window = ?node.key(), "skipping stale window");
            return;
        };
        if window.fullscreen.is_active() && !node.ignore_fullscreen_checks {
            return;
        }
        let Some(ws) = host.workspace(node.workspace) else { return };
        let Some(monitor) = ws.monitor.and_then(|m| host.monitor(m)) else { return };

        let scale = (ws.is_special && !window.fullscreen.is_active())
            .then_some(self.settings.special_scale_factor);
        let frame = finish_frame(node.frame(), monitor.usable_area(), &self.settings.gaps, scale);
        trace!(window = ?window.id, ?frame, "apply");
        host.apply_geometry(window.id, frame, self.suppress_animation);
    }
}
