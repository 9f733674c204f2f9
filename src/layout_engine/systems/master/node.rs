use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::model::{WindowId, WindowRef, WorkspaceId};
use crate::sys::geometry::{Point, Rect, Size};

slotmap::new_key_type! {
    pub struct NodeId;
}

/// One tiled window.
///
/// Nodes are compared by [`MasterNode::key`], never structurally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MasterNode {
    pub is_master: bool,
    /// Share of the workspace given to the master band. Equal on all masters
    /// of a workspace.
    pub perc_master: f64,
    pub window: WindowRef,
    /// Last computed tile, before gaps.
    pub position: Point,
    pub size: Size,
    /// Weight among the nodes sharing this node's role and workspace.
    pub perc_size: f64,
    pub workspace: WorkspaceId,
    /// Set on the throwaway nodes used to lay out a maximized window.
    pub ignore_fullscreen_checks: bool,
}

impl MasterNode {
    pub fn new(window: WindowId, workspace: WorkspaceId, perc_master: f64) -> Self {
        Self {
            is_master: false,
            perc_master,
            window: WindowRef::new(window),
            position: Point::default(),
            size: Size::default(),
            perc_size: 1.0,
            workspace,
            ignore_fullscreen_checks: false,
        }
    }

    /// A node that is never stored, used to push an arbitrary frame through the
    /// window-application step.
    pub fn synthetic(window: WindowId, workspace: WorkspaceId, frame: Rect) -> Self {
        Self {
            position: frame.origin,
            size: frame.size,
            ignore_fullscreen_checks: true,
            ..Self::new(window, workspace, 0.5)
        }
    }

    pub fn key(&self) -> WindowId { self.window.id() }

    pub fn frame(&self) -> Rect { Rect::new(self.position, self.size) }
}

/// Ordered storage for every node of every workspace.
///
/// Order is global; the per-workspace order is the global order filtered by
/// workspace.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: SlotMap<NodeId, MasterNode>,
    order: Vec<NodeId>,
}

impl NodeStore {
    pub fn len(&self) -> usize { self.order.len() }

    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    pub fn get(&self, id: NodeId) -> Option<&MasterNode> { self.nodes.get(id) }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut MasterNode> { self.nodes.get_mut(id) }

    pub fn find(&self, window: WindowId) -> Option<NodeId> {
        self.order.iter().copied().find(|&id| self.nodes[id].key() == window)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NodeId, &MasterNode)> + '_ {
        self.order.iter().map(move |&id| (id, &self.nodes[id]))
    }

    pub fn on_workspace(
        &self,
        workspace: WorkspaceId,
    ) -> impl DoubleEndedIterator<Item = (NodeId, &MasterNode)> + '_ {
        self.iter().filter(move |(_, n)| n.workspace == workspace)
    }

    /// Snapshot of the ids on `workspace`, for loops that mutate the store.
    pub fn ids_on(&self, workspace: WorkspaceId) -> Vec<NodeId> {
        self.on_workspace(workspace).map(|(id, _)| id).collect()
    }

    pub fn count_on_workspace(&self, workspace: WorkspaceId) -> usize {
        self.on_workspace(workspace).count()
    }

    pub fn masters_on_workspace(&self, workspace: WorkspaceId) -> usize {
        self.on_workspace(workspace).filter(|(_, n)| n.is_master).count()
    }

    /// The first master in order.
    pub fn master_on_workspace(&self, workspace: WorkspaceId) -> Option<NodeId> {
        self.on_workspace(workspace).find(|(_, n)| n.is_master).map(|(id, _)| id)
    }

    /// The first slave in order.
    pub fn first_slave_on_workspace(&self, workspace: WorkspaceId) -> Option<NodeId> {
        self.on_workspace(workspace).find(|(_, n)| !n.is_master).map(|(id, _)| id)
    }

    pub fn push_front(&mut self, node: MasterNode) -> NodeId {
        let id = self.nodes.insert(node);
        self.order.insert(0, id);
        id
    }

    pub fn push_back(&mut self, node: MasterNode) -> NodeId {
        let id = self.nodes.insert(node);
        self.order.push(id);
        id
    }

    /// Inserts directly before `anchor`, or at the end if `anchor` is unknown.
    pub fn insert_before(&mut self, anchor: NodeId, node: MasterNode) -> NodeId {
        let at = self.position(anchor).unwrap_or(self.order.len());
        let id = self.nodes.insert(node);
        self.order.insert(at, id);
        id
    }

    /// Inserts directly after `anchor`, or at the end if `anchor` is unknown.
    pub fn insert_after(&mut self, anchor: NodeId, node: MasterNode) -> NodeId {
        let at = self.position(anchor).map_or(self.order.len(), |i| i + 1);
        let id = self.nodes.insert(node);
        self.order.insert(at, id);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<MasterNode> {
        let at = self.position(id)?;
        self.order.remove(at);
        self.nodes.remove(id)
    }

    /// Moves `id` directly before `anchor`, or to the end when `anchor` is `None`.
    pub fn move_before(&mut self, id: NodeId, anchor: Option<NodeId>) {
        if anchor == Some(id) {
            return;
        }
        let Some(from) = self.position(id) else { return };
        self.order.remove(from);
        let to = anchor.and_then(|a| self.position(a)).unwrap_or(self.order.len());
        self.order.insert(to, id);
    }

    pub fn move_to_front(&mut self, id: NodeId) {
        let first = self.order.first().copied();
        self.move_before(id, first);
    }

    /// The node following `id` in global order.
    pub fn next_after(&self, id: NodeId) -> Option<NodeId> {
        let at = self.position(id)?;
        self.order.get(at + 1).copied()
    }

    /// Exchanges the windows two nodes point at, keeping roles and ratios in place.
    pub fn swap_windows(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (Some(wa), Some(wb)) = (self.get(a).map(|n| n.window), self.get(b).map(|n| n.window))
        else {
            return;
        };
        self.nodes[a].window = wb;
        self.nodes[b].window = wa;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }

    fn position(&self, id: NodeId) -> Option<usize> { self.order.iter().position(|&n| n == id) }
}

impl Index<NodeId> for NodeStore {
    type Output = MasterNode;

    fn index(&self, id: NodeId) -> &MasterNode { &self.nodes[id] }
}

impl IndexMut<NodeId> for NodeStore {
    fn index_mut(&mut self, id: NodeId) -> &mut MasterNode { &mut self.nodes[id] }
}
