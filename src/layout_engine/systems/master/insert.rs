use std::sync::Arc;

use tracing::{debug, warn};

use super::{MasterLayoutSystem, MasterNode, NodeId};
use crate::common::config::{NewOnActive, NewStatus};
use crate::layout_engine::MasterOrientation;
use crate::model::{LayoutHost, WindowId, WorkspaceId};
use crate::sys::geometry::Point;

impl MasterLayoutSystem {
    /// Adds a node for `window` and lays out its monitor.
    ///
    /// Windows that cannot fit their tile are handed back to the host as
    /// floating instead.
    pub fn on_window_tiled(&mut self, host: &mut dyn LayoutHost, window: WindowId) {
        let Some(info) = host.window(window) else { return };
        if info.floating || self.nodes.find(window).is_some() {
            return;
        }
        let settings = Arc::clone(&self.settings);
        let workspace = info.workspace;

        let focused = host.focused_window().filter(|&f| f != window);
        let focused_node = focused.and_then(|f| self.nodes.find(f));
        let id = self.place_new_node(MasterNode::new(window, workspace, settings.mfact), focused_node);
        let windows_on_ws = self.nodes.count_on_workspace(workspace);

        let opening_on = match focused_node {
            Some(node)
                if focused
                    .and_then(|f| host.window(f))
                    .is_some_and(|f| f.workspace == workspace) =>
            {
                Some(node)
            }
            _ => self.nodes.master_on_workspace(workspace),
        };
        let opening_on_master = opening_on.is_some_and(|n| self.nodes[n].is_master);

        let moving = host.is_interactive_move();
        let mut dropped_on_master = false;
        if settings.drop_at_cursor && moving {
            let orientation = self.orientation_for(host, workspace);
            let pointer = host.pointer();
            if windows_on_ws > 2 {
                self.drop_at_cursor(id, workspace, pointer, orientation);
            } else if windows_on_ws == 2 {
                dropped_on_master = self.pointer_on_master_side(workspace, pointer, orientation);
            }
        }

        let becomes_master = (settings.new_status == NewStatus::Master && !moving)
            || windows_on_ws == 1
            || (windows_on_ws > 2 && !info.first_map && opening_on_master)
            || dropped_on_master
            || (settings.new_status == NewStatus::Inherit && opening_on_master && !moving);

        let mut perc_master = settings.mfact;
        let mut demoted = None;
        if becomes_master {
            let masters: Vec<NodeId> = self
                .nodes
                .on_workspace(workspace)
                .filter(|(n, node)| *n != id && node.is_master)
                .map(|(n, _)| n)
                .collect();
            let previous = if settings.new_on_active == NewOnActive::Before {
                masters.last().copied()
            } else {
                masters.first().copied()
            };
            if let Some(previous) = previous {
                self.nodes[previous].is_master = false;
                perc_master = self.nodes[previous].perc_master;
                demoted = Some(previous);
            }
        }
        let node = &mut self.nodes[id];
        node.is_master = becomes_master;
        node.perc_master = perc_master;
        debug!(?window, ?workspace, becomes_master, windows_on_ws, "tiled window");

        if let (Some(max), Some(monitor)) = (info.max_size, host.monitor(info.monitor)) {
            let mon = monitor.frame.size;
            let too_small = if becomes_master {
                max.width < mon.width * perc_master || max.height < mon.height
            } else {
                let slaves_share = (windows_on_ws.max(2) - 1) as f64;
                max.width < mon.width * (1.0 - perc_master) || max.height < mon.height / slaves_share
            };
            if too_small {
                warn!(?window, ?max, "window cannot fit its tile, floating it");
                self.nodes.remove(id);
                if let Some(previous) = demoted {
                    self.nodes[previous].is_master = true;
                }
                host.request_floating_fallback(window);
                return;
            }
        }

        self.recalculate_monitor(host, info.monitor);
    }

    fn place_new_node(&mut self, node: MasterNode, focused: Option<NodeId>) -> NodeId {
        let settings = &self.settings;
        if settings.new_on_active != NewOnActive::None && settings.new_status != NewStatus::Master {
            if let Some(anchor) = focused {
                let anchor_node = &self.nodes[anchor];
                let sole_or_strict_master = anchor_node.is_master
                    && (self.nodes.masters_on_workspace(node.workspace) == 1
                        || settings.new_status == NewStatus::Slave);
                if !sole_or_strict_master {
                    return match settings.new_on_active {
                        NewOnActive::Before => self.nodes.insert_before(anchor, node),
                        _ => self.nodes.insert_after(anchor, node),
                    };
                }
            }
        }
        if settings.new_on_top {
            self.nodes.push_front(node)
        } else {
            self.nodes.push_back(node)
        }
    }

    /// Moves a node dragged onto the workspace next to the tile under the pointer.
    fn drop_at_cursor(
        &mut self,
        id: NodeId,
        workspace: WorkspaceId,
        pointer: Point,
        orientation: MasterOrientation,
    ) {
        let Some((target, frame)) = self
            .nodes
            .on_workspace(workspace)
            .find(|(n, node)| *n != id && node.frame().contains(pointer))
            .map(|(n, node)| (n, node.frame()))
        else {
            return;
        };
        let mid = frame.mid();
        let after = match orientation {
            MasterOrientation::Left | MasterOrientation::Right => pointer.y > mid.y,
            MasterOrientation::Top | MasterOrientation::Bottom => pointer.x > mid.x,
            MasterOrientation::Center => false,
        };
        let anchor = if after { self.nodes.next_after(target) } else { Some(target) };
        self.nodes.move_before(id, anchor);
    }

    /// With one existing tile, whether the pointer is on the side its master occupies.
    fn pointer_on_master_side(
        &self,
        workspace: WorkspaceId,
        pointer: Point,
        orientation: MasterOrientation,
    ) -> bool {
        let Some(master) = self.nodes.master_on_workspace(workspace) else {
            return false;
        };
        let mid = self.nodes[master].frame().mid();
        match orientation {
            MasterOrientation::Left | MasterOrientation::Center => pointer.x < mid.x,
            MasterOrientation::Right => pointer.x > mid.x,
            MasterOrientation::Top => pointer.y < mid.y,
            MasterOrientation::Bottom => pointer.y > mid.y,
        }
    }
}
