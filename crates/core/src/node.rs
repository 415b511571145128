//! Node abstraction over a backing container.
//!
//! The container is consumed through [`ContainerNode`], a handle type that
//! knows its kind, name, class attribute, relatives and link status. Generic
//! algorithms never dispatch on the handle directly; they work on the closed
//! [`Node`] enum, which is built once per handle from its kind tag and then
//! matched exhaustively.
use std::fmt;
use std::hash::Hash;

use nxquery_path::Path;

use crate::link::Link;

/// Name of the attribute carrying the class of a group or field.
pub const CLASS_ATTRIBUTE: &str = "NX_class";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Group,
    Field,
    Attribute,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Group => "group",
            NodeKind::Field => "field",
            NodeKind::Attribute => "attribute",
        })
    }
}

/// Handle into the backing container.
///
/// Handles are cheap to clone and compare by identity. They are read-only
/// views; the container must outlive every handle obtained from it.
///
/// Link entries are handles too: [`ContainerNode::link`] returns their link
/// record and [`ContainerNode::open`] yields the target object addressed
/// through the entry. A dangling link entry reports itself as invalid.
pub trait ContainerNode: Clone + Eq + Hash + fmt::Debug {
    fn kind(&self) -> NodeKind;

    /// False once the object behind the handle was removed from the container.
    fn is_valid(&self) -> bool;

    fn name(&self) -> String;

    /// Value of the [`CLASS_ATTRIBUTE`] of a group or field.
    fn class_attribute(&self) -> Option<String>;

    /// Parent group of a group or field (`None` at the root), host node of
    /// an attribute.
    fn parent(&self) -> Option<Self>;

    /// Direct children in container enumeration order. Empty for fields and
    /// attributes.
    fn children(&self) -> Vec<Self>;

    fn attributes(&self) -> Vec<Self>;

    /// Link record if this handle is addressed through a link entry.
    fn link(&self) -> Option<Link> {
        None
    }

    /// Target of a link entry, opened through the entry: name, parent and
    /// path are those of the entry, kind, class, children and attributes
    /// those of the target. Plain handles return themselves, unresolvable
    /// links `None`.
    fn open(&self) -> Option<Self>;

    /// The object behind the handle addressed at its own location.
    fn canonical(&self) -> Self {
        self.clone()
    }

    /// Look up `path` in the container of this handle. Absolute paths start
    /// at the root, relative ones at `self`. `None` if nothing is found.
    fn resolve(&self, path: &Path) -> Option<Self>;

    /// Name of the file the container belongs to, empty if unknown.
    fn filename(&self) -> String {
        String::new()
    }
}

/// A container handle tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node<N> {
    Group(N),
    Field(N),
    Attribute(N),
}

impl<N: ContainerNode> Node<N> {
    pub fn new(handle: N) -> Self {
        match handle.kind() {
            NodeKind::Group => Node::Group(handle),
            NodeKind::Field => Node::Field(handle),
            NodeKind::Attribute => Node::Attribute(handle),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group(_) => NodeKind::Group,
            Node::Field(_) => NodeKind::Field,
            Node::Attribute(_) => NodeKind::Attribute,
        }
    }

    pub fn handle(&self) -> &N {
        match self {
            Node::Group(handle) | Node::Field(handle) | Node::Attribute(handle) => handle,
        }
    }

    pub fn into_handle(self) -> N {
        match self {
            Node::Group(handle) | Node::Field(handle) | Node::Attribute(handle) => handle,
        }
    }

    pub fn name(&self) -> String {
        self.handle().name()
    }

    pub fn is_valid(&self) -> bool {
        self.handle().is_valid()
    }
}

impl<N: ContainerNode> From<N> for Node<N> {
    fn from(handle: N) -> Self {
        Node::new(handle)
    }
}

/// Open a link entry. Plain entries are returned unchanged; dangling or
/// unresolvable links yield `None`.
pub(crate) fn follow<N: ContainerNode>(entry: N) -> Option<N> {
    let Some(link) = entry.link() else {
        return Some(entry);
    };
    if link.is_dangling() {
        tracing::debug!(link = %link, "dangling link skipped");
        return None;
    }
    match entry.open() {
        Some(target) if target.is_valid() => Some(target),
        _ => {
            tracing::debug!(link = %link, status = ?link.status(), "link target not found");
            None
        }
    }
}
