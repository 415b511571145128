//! Node abstraction and search over NeXus-style hierarchical containers.
//!
//! A backing container exposes its objects through [`ContainerNode`]
//! handles. Handles are wrapped in the closed [`Node`] enum, on which the
//! generic algorithms ([`get_child`], [`get_object`], [`get_path`], ...) and
//! the predicate-driven [`search`] operate. Paths come from
//! [`nxquery_path`].
pub mod algorithm;
pub mod error;
pub mod link;
pub mod memory;
pub mod node;
pub mod predicates;
pub mod search;

pub use algorithm::{
    get_attribute, get_child, get_class, get_name, get_object, get_parent, get_path, get_root,
    is_attribute, is_class, is_field, is_group, is_valid,
};
pub use error::{NodeError, Result};
pub use link::{Link, LinkStatus, LinkType};
pub use node::{CLASS_ATTRIBUTE, ContainerNode, Node, NodeKind};
pub use nxquery_path::{GroupElement, Path, PathError};
pub use search::{MatchSet, Search, SearchOptions, search, search_with};
