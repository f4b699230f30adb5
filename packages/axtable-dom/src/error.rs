//! Errors returned by DOM mutation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("No node with id {node_id} exists in the document")]
    NoSuchNode { node_id: usize },

    #[error("Node {node_id} is not an element")]
    NotAnElement { node_id: usize },

    #[error("Cannot insert node {child} under {parent}: it would create a cycle")]
    HierarchyRequest { parent: usize, child: usize },

    #[error("The document root cannot be removed")]
    CannotRemoveRoot,
}

pub type DomResult<T> = Result<T, DomError>;
