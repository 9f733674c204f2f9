mod master;

#[cfg(test)]
pub(crate) use master::testing;
pub use master::{
    FocusTarget, MasterLayoutSystem, MasterNode, NodeId, NodeStore, arrange, effective_orientation,
};
