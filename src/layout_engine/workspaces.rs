use super::MasterOrientation;
use crate::common::collections::HashMap;
use crate::model::WorkspaceId;

/// Orientation chosen for each workspace, created the first time a workspace
/// is laid out.
#[derive(Debug, Default)]
pub(crate) struct WorkspaceOrientations {
    map: HashMap<WorkspaceId, MasterOrientation>,
}

impl WorkspaceOrientations {
    pub(crate) fn get(&self, workspace: WorkspaceId) -> Option<MasterOrientation> {
        self.map.get(&workspace).copied()
    }

    pub(crate) fn get_or_insert(
        &mut self,
        workspace: WorkspaceId,
        default: MasterOrientation,
    ) -> MasterOrientation {
        *self.map.entry(workspace).or_insert(default)
    }

    pub(crate) fn set(&mut self, workspace: WorkspaceId, orientation: MasterOrientation) {
        self.map.insert(workspace, orientation);
    }

    pub(crate) fn remove(&mut self, workspace: WorkspaceId) -> Option<MasterOrientation> {
        self.map.remove(&workspace)
    }

    pub(crate) fn clear(&mut self) { self.map.clear(); }
}
