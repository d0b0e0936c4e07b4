//! DOM Node Operations errors
//!
//! Failures of appendChild, removeChild, insertBefore and cloneNode.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error: cannot insert {node} into {parent}")]
    HierarchyRequest { parent: NodeId, node: NodeId },
    /// Invalid node type for the requested operation
    #[error("invalid node type for {0}")]
    InvalidNodeType(NodeId),
    /// Node is not a child of the given parent
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomError::NotAChild { parent: NodeId(1), child: NodeId(2) };
        assert_eq!(err.to_string(), "#2 is not a child of #1");
        assert_eq!(DomError::NotFound(NodeId(9)).to_string(), "node #9 not found");
    }
}
