use tracing::debug;

use super::{MasterLayoutSystem, NodeId, effective_orientation};
use crate::common::config::{MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};
use crate::layout_engine::utils::TouchingEdges;
use crate::layout_engine::{MasterOrientation, Orientation, ResizeCorner};
use crate::model::{LayoutHost, MonitorInfo, WindowId};
use crate::sys::geometry::Point;

const MIN_PERC_SIZE: f64 = 0.05;
const MAX_PERC_SIZE: f64 = 1.95;
/// In smart mode no node may shrink below this share of an even split.
const MIN_SHARE_OF_AVERAGE: f64 = 0.2;

impl MasterLayoutSystem {
    /// Turns a pointer drag of `delta` pixels on `window` (default: the focused
    /// window) into ratio changes, then lays out the monitor without animation.
    pub fn resize_active_window(
        &mut self,
        host: &mut dyn LayoutHost,
        delta: Point,
        corner: ResizeCorner,
        window: Option<WindowId>,
    ) {
        let Some(window) = window.or_else(|| host.focused_window()) else { return };
        let Some(info) = host.window(window) else { return };
        let Some(id) = self.nodes.find(window) else { return };
        let Some(monitor) = host.monitor(info.monitor) else { return };

        self.suppress_animation = true;
        self.resize_node(host, id, &monitor, delta, corner);
        self.suppress_animation = false;
    }

    fn resize_node(
        &mut self,
        host: &mut dyn LayoutHost,
        id: NodeId,
        monitor: &MonitorInfo,
        delta: Point,
        corner: ResizeCorner,
    ) {
        let node = self.nodes[id].clone();
        let workspace = node.workspace;
        let windows = self.nodes.count_on_workspace(workspace);
        let masters = self.nodes.masters_on_workspace(workspace);
        let slaves = windows - masters;
        let orientation = self.orientation_for(host, workspace);
        let (_, centered) = effective_orientation(orientation, slaves, &self.settings);
        if windows == 1 && !centered {
            return;
        }

        let usable = monitor.usable_area();
        let edges = TouchingEdges::of(node.frame(), usable);
        let smart = self.settings.smart_resizing;
        let mon = monitor.frame.size;

        let split_delta = match orientation {
            MasterOrientation::Left => delta.x / mon.width,
            MasterOrientation::Right => -delta.x / mon.width,
            MasterOrientation::Top => delta.y / mon.height,
            MasterOrientation::Bottom => -delta.y / mon.height,
            MasterOrientation::Center => {
                let mut d = delta.x / mon.width;
                if centered {
                    if corner != ResizeCorner::None || !node.is_master {
                        d *= 2.0;
                    }
                    if (!node.is_master && edges.left)
                        || (node.is_master && corner.affects_left() && smart)
                    {
                        d = -d;
                    }
                }
                d
            }
        };
        if let Some(resizing) = monitor.active_special_workspace.or(monitor.active_workspace) {
            for other in self.nodes.ids_on(resizing) {
                let n = &mut self.nodes[other];
                if n.is_master {
                    n.perc_master =
                        (n.perc_master + split_delta).clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO);
                }
            }
        }

        let vertical = orientation.stack_axis() == Orientation::Vertical;
        let stack_delta = if vertical { delta.y } else { delta.x };
        let mut column = if node.is_master { masters } else { slaves };
        let split_column = centered && !node.is_master;
        if split_column {
            column = if edges.right { (column + 1) / 2 } else { column / 2 };
        }

        if stack_delta != 0.0 && column > 1 {
            let extent = if vertical { usable.size.height } else { usable.size.width };
            let share = extent / column as f64;
            if !smart {
                let n = &mut self.nodes[id];
                n.perc_size = (n.perc_size + stack_delta / share).clamp(MIN_PERC_SIZE, MAX_PERC_SIZE);
            } else {
                let resize_prev = if vertical {
                    (corner.affects_top() || edges.bottom) && !edges.top
                } else {
                    (corner.affects_left() || edges.right) && !edges.left
                };
                self.redistribute(id, vertical, resize_prev, split_column, stack_delta, share);
            }
        }
        debug!(window = ?node.key(), ?split_delta, ?stack_delta, "resized");

        if let Some(monitor) = self.monitor_for_workspace(host, workspace) {
            self.recalculate_monitor(host, monitor.id);
        }
    }

    /// Grows or shrinks a node and takes the difference from the siblings on
    /// one side of it, in proportion to how far each is above the minimum.
    fn redistribute(
        &mut self,
        id: NodeId,
        vertical: bool,
        resize_prev: bool,
        same_column_only: bool,
        delta: f64,
        share: f64,
    ) {
        let node = self.nodes[id].clone();
        let extent_of = |n: &super::MasterNode| if vertical { n.size.height } else { n.size.width };

        let all = self.nodes.ids_on(node.workspace);
        let Some(at) = all.iter().position(|&n| n == id) else { return };
        let side: Vec<NodeId> = if resize_prev {
            all[..at].iter().rev().copied().collect()
        } else {
            all[at + 1..].iter().copied().collect()
        };
        let siblings: Vec<NodeId> = side
            .into_iter()
            .filter(|&n| self.nodes[n].is_master == node.is_master)
            .enumerate()
            // Centered slaves alternate columns; only every other one shares ours.
            .filter(|(i, _)| !same_column_only || i % 2 == 1)
            .map(|(_, n)| n)
            .collect();

        let size_left: f64 = siblings.iter().map(|&n| extent_of(&self.nodes[n])).sum();
        let nodes_left = siblings.len() as f64;
        let min_size = share * MIN_SHARE_OF_AVERAGE;
        let max_grow = size_left - nodes_left * min_size;
        let max_shrink = min_size - extent_of(&node);

        let diff = if resize_prev { -delta } else { delta };
        let diff = diff.max(max_shrink).min(max_grow);

        self.nodes[id].perc_size += diff / share;
        for &n in &siblings {
            let slack = extent_of(&self.nodes[n]) - min_size;
            let take = if max_grow != 0.0 { diff * slack / max_grow } else { diff / nodes_left };
            self.nodes[n].perc_size -= take / share;
        }
    }
}
