//! In-memory container for tests, examples and quick prototypes.
//!
//! Nodes are `Arc`-backed and compare by identity. Trees are assembled with
//! a small builder:
//!
//! ```
//! use nxquery_core::memory::{attr, field, group, root};
//! use nxquery_core::ContainerNode;
//!
//! let file = root("scan.nxs")
//!     .child(
//!         group("entry", "NXentry")
//!             .child(field("title").value("calibration"))
//!             .child(group("data", "NXdata").child(field("x").attr(attr("units", "mm")))),
//!     )
//!     .build();
//!
//! let entry = &file.children()[0];
//! assert_eq!(entry.class_attribute().as_deref(), Some("NXentry"));
//! assert_eq!(entry.children().len(), 2);
//! ```
//!
//! Links are entries that carry a target path instead of content. Internal
//! targets are looked up relative to the group holding the link; targets in
//! another file never resolve and report as dangling.
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use nxquery_path::{GroupElement, Path};

use crate::link::{Link, LinkStatus, LinkType};
use crate::node::{CLASS_ATTRIBUTE, ContainerNode, NodeKind};

/// Upper bound on chained links followed by a single lookup.
pub const MAX_LINK_HOPS: usize = 16;

#[derive(Debug)]
struct LinkData {
    target: Path,
    link_type: LinkType,
}

#[derive(Debug)]
struct Inner {
    kind: NodeKind,
    name: String,
    value: RwLock<Option<String>>,
    link: Option<LinkData>,
    file_name: String,
    valid: AtomicBool,
    parent: RwLock<Option<Weak<Inner>>>,
    attributes: RwLock<Vec<MemoryNode>>,
    children: RwLock<Vec<MemoryNode>>,
}

/// Handle into the in-memory tree.
///
/// A handle obtained through a link entry keeps that entry: it is named and
/// placed like the entry while kind, class, children and attributes come
/// from the target object.
#[derive(Clone)]
pub struct MemoryNode {
    object: Arc<Inner>,
    entry: Option<Arc<Inner>>,
}

impl PartialEq for MemoryNode {
    fn eq(&self, other: &Self) -> bool {
        let same_entry = match (&self.entry, &other.entry) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        Arc::ptr_eq(&self.object, &other.object) && same_entry
    }
}

impl Eq for MemoryNode {}

impl std::hash::Hash for MemoryNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.object).hash(state);
        self.entry.as_ref().map(Arc::as_ptr).hash(state);
    }
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryNode")
            .field("kind", &self.object.kind)
            .field("name", &self.object.name)
            .field("entry", &self.entry.as_ref().map(|entry| &entry.name))
            .field("link", &self.object.link)
            .field("valid", &self.object.valid.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MemoryNode {
    fn new(
        kind: NodeKind,
        name: impl Into<String>,
        file_name: impl Into<String>,
        link: Option<LinkData>,
    ) -> Self {
        Self::plain(Arc::new(Inner {
            kind,
            name: name.into(),
            value: RwLock::new(None),
            link,
            file_name: file_name.into(),
            valid: AtomicBool::new(true),
            parent: RwLock::new(None),
            attributes: RwLock::new(Vec::new()),
            children: RwLock::new(Vec::new()),
        }))
    }

    fn plain(object: Arc<Inner>) -> Self {
        Self { object, entry: None }
    }

    /// The tree entry this handle is addressed through.
    fn anchor(&self) -> &Arc<Inner> {
        self.entry.as_ref().unwrap_or(&self.object)
    }

    pub fn value(&self) -> Option<String> {
        self.object.value.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.object.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value.into());
    }

    /// Attach `child` to this group. Fields and attributes take no children.
    pub fn add_child(&self, child: MemoryNode) {
        let child = Self::plain(child.anchor().clone());
        if self.object.kind != NodeKind::Group || child.object.kind == NodeKind::Attribute {
            tracing::debug!(
                parent = %self.object.name,
                child = %child.object.name,
                "child rejected"
            );
            return;
        }
        child.set_parent(self);
        self.object.children.write().unwrap_or_else(PoisonError::into_inner).push(child);
    }

    pub fn add_attribute(&self, attribute: MemoryNode) {
        let attribute = Self::plain(attribute.anchor().clone());
        if self.object.kind == NodeKind::Attribute || attribute.object.kind != NodeKind::Attribute {
            tracing::debug!(
                host = %self.object.name,
                attribute = %attribute.object.name,
                "attribute rejected"
            );
            return;
        }
        attribute.set_parent(self);
        self.object.attributes.write().unwrap_or_else(PoisonError::into_inner).push(attribute);
    }

    /// Detach the entry this handle is addressed through. The entry and
    /// everything below it become invalid.
    pub fn remove(&self) {
        let anchor = Self::plain(self.anchor().clone());
        if let Some(parent) = anchor.parent_node() {
            let list = if anchor.object.kind == NodeKind::Attribute {
                &parent.object.attributes
            } else {
                &parent.object.children
            };
            list.write().unwrap_or_else(PoisonError::into_inner).retain(|entry| *entry != anchor);
        }
        *anchor.object.parent.write().unwrap_or_else(PoisonError::into_inner) = None;
        anchor.invalidate();
    }

    /// Topmost node of the tree this node is attached to.
    pub fn tree_root(&self) -> MemoryNode {
        let mut current = Self::plain(self.anchor().clone());
        while let Some(parent) = current.parent_node() {
            current = parent;
        }
        current
    }

    /// Absolute path of the entry this handle is addressed through.
    pub fn path(&self) -> Path {
        if self.object.kind == NodeKind::Attribute {
            let mut path = self.parent_node().map_or_else(Path::root, |host| host.path());
            path.set_attribute(self.anchor().name.as_str());
            return path;
        }
        let mut path = Path::from_parts(self.filename(), true, Vec::<GroupElement>::new(), "");
        let mut current = self.clone();
        while let Some(parent) = current.parent_node() {
            let class = current.class_attribute().unwrap_or_default();
            path.prepend(current.anchor().name.as_str(), class);
            current = parent;
        }
        path
    }

    fn set_parent(&self, parent: &MemoryNode) {
        let mut slot = self.object.parent.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::downgrade(&parent.object));
    }

    fn parent_node(&self) -> Option<MemoryNode> {
        let slot = self.anchor().parent.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().and_then(Weak::upgrade).map(Self::plain)
    }

    fn invalidate(&self) {
        self.object.valid.store(false, Ordering::Relaxed);
        for node in self.stored_children().iter().chain(self.stored_attributes().iter()) {
            node.invalidate();
        }
    }

    fn stored_children(&self) -> Vec<MemoryNode> {
        self.object.children.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn stored_attributes(&self) -> Vec<MemoryNode> {
        self.object.attributes.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn is_link_entry(&self) -> bool {
        self.entry.is_none() && self.object.link.is_some()
    }

    /// Object behind the link this handle is addressed through, itself
    /// possibly reached through a further link. `None` for an unresolvable
    /// link or when the hop budget runs out.
    fn target(&self, hops: usize) -> Option<MemoryNode> {
        let anchor = self.anchor();
        let Some(data) = &anchor.link else {
            return Some(self.clone());
        };
        if hops == 0 {
            tracing::debug!(link = %anchor.name, "link chain too long");
            return None;
        }
        let entry = Self::plain(anchor.clone());
        let base = entry.parent_node().unwrap_or(entry);
        base.lookup(&data.target, hops - 1)
    }

    fn open_with(&self, hops: usize) -> Option<MemoryNode> {
        if self.anchor().link.is_none() {
            return Some(self.clone());
        }
        let target = self.target(hops)?;
        Some(Self { object: target.object, entry: Some(self.anchor().clone()) })
    }

    fn lookup(&self, path: &Path, hops: usize) -> Option<MemoryNode> {
        if path.has_filename() && path.filename() != self.filename() {
            return None;
        }
        let mut current = if path.is_absolute() { self.tree_root() } else { self.clone() };
        for element in path {
            if element.is_current() {
                continue;
            }
            if element.is_parent() {
                current = current.parent_node().unwrap_or(current);
                continue;
            }
            current = current.stored_children().into_iter().find_map(|entry| {
                if element.has_name() && entry.object.name != element.name() {
                    return None;
                }
                let object = entry.open_with(hops)?;
                let class_ok = !element.has_class()
                    || object.class_attribute().as_deref() == Some(element.class());
                class_ok.then_some(object)
            })?;
        }
        if path.has_attribute() {
            current
                .stored_attributes()
                .into_iter()
                .find(|attribute| attribute.object.name == path.attribute())
        } else {
            Some(current)
        }
    }
}

impl ContainerNode for MemoryNode {
    fn kind(&self) -> NodeKind {
        if self.is_link_entry() {
            self.target(MAX_LINK_HOPS).map_or(NodeKind::Field, |target| target.object.kind)
        } else {
            self.object.kind
        }
    }

    fn is_valid(&self) -> bool {
        let alive = self.object.valid.load(Ordering::Relaxed)
            && self.anchor().valid.load(Ordering::Relaxed);
        alive && (self.anchor().link.is_none() || self.target(MAX_LINK_HOPS).is_some())
    }

    fn name(&self) -> String {
        self.anchor().name.clone()
    }

    fn class_attribute(&self) -> Option<String> {
        if self.object.kind == NodeKind::Attribute {
            return None;
        }
        self.stored_attributes()
            .into_iter()
            .find(|attribute| attribute.object.name == CLASS_ATTRIBUTE)?
            .value()
    }

    fn parent(&self) -> Option<Self> {
        self.parent_node()
    }

    fn children(&self) -> Vec<Self> {
        self.stored_children()
    }

    fn attributes(&self) -> Vec<Self> {
        self.stored_attributes()
    }

    fn link(&self) -> Option<Link> {
        let data = self.anchor().link.as_ref()?;
        let status = if self.target(MAX_LINK_HOPS).is_some() {
            LinkStatus::Valid
        } else {
            LinkStatus::Dangling
        };
        Some(Link::new(self.path(), data.target.clone(), status, data.link_type))
    }

    fn open(&self) -> Option<Self> {
        self.open_with(MAX_LINK_HOPS)
    }

    fn canonical(&self) -> Self {
        Self::plain(self.object.clone())
    }

    fn resolve(&self, path: &Path) -> Option<Self> {
        self.lookup(path, MAX_LINK_HOPS)
    }

    fn filename(&self) -> String {
        self.tree_root().object.file_name.clone()
    }
}

pub struct MemoryNodeBuilder {
    node: MemoryNode,
    pending_children: Vec<MemoryNode>,
    pending_attrs: Vec<MemoryNode>,
}

impl MemoryNodeBuilder {
    fn new(node: MemoryNode) -> Self {
        Self { node, pending_children: Vec::new(), pending_attrs: Vec::new() }
    }

    pub fn child(mut self, child: impl Into<MemoryNodeOrBuilder>) -> Self {
        match child.into() {
            MemoryNodeOrBuilder::Built(node) => self.pending_children.push(node),
            MemoryNodeOrBuilder::Builder(builder) => self.pending_children.push(builder.build()),
        }
        self
    }

    pub fn children<I: IntoIterator<Item = MemoryNodeOrBuilder>>(self, children: I) -> Self {
        children.into_iter().fold(self, |builder, child| builder.child(child))
    }

    pub fn attr(mut self, attribute: MemoryNode) -> Self {
        self.pending_attrs.push(attribute);
        self
    }

    /// Set the class attribute.
    pub fn class(self, class: &str) -> Self {
        self.attr(attr(CLASS_ATTRIBUTE, class))
    }

    pub fn value(self, value: &str) -> Self {
        self.node.set_value(value);
        self
    }

    pub fn build(self) -> MemoryNode {
        for attribute in self.pending_attrs {
            self.node.add_attribute(attribute);
        }
        for child in self.pending_children {
            self.node.add_child(child);
        }
        self.node
    }
}

pub enum MemoryNodeOrBuilder {
    Built(MemoryNode),
    Builder(MemoryNodeBuilder),
}

impl From<MemoryNode> for MemoryNodeOrBuilder {
    fn from(node: MemoryNode) -> Self {
        MemoryNodeOrBuilder::Built(node)
    }
}

impl From<MemoryNodeBuilder> for MemoryNodeOrBuilder {
    fn from(builder: MemoryNodeBuilder) -> Self {
        MemoryNodeOrBuilder::Builder(builder)
    }
}

/// Root group of a file.
pub fn root(file_name: &str) -> MemoryNodeBuilder {
    MemoryNodeBuilder::new(MemoryNode::new(NodeKind::Group, "/", file_name, None))
}

/// Group with the given class; an empty class leaves the class attribute out.
pub fn group(name: &str, class: &str) -> MemoryNodeBuilder {
    let builder = MemoryNodeBuilder::new(MemoryNode::new(NodeKind::Group, name, "", None));
    if class.is_empty() { builder } else { builder.class(class) }
}

pub fn field(name: &str) -> MemoryNodeBuilder {
    MemoryNodeBuilder::new(MemoryNode::new(NodeKind::Field, name, "", None))
}

pub fn attr(name: &str, value: &str) -> MemoryNode {
    let node = MemoryNode::new(NodeKind::Attribute, name, "", None);
    node.set_value(value);
    node
}

/// Soft link to `target` inside the same file.
pub fn link(name: &str, target: Path) -> MemoryNode {
    let data = LinkData { target, link_type: LinkType::Soft };
    MemoryNode::new(NodeKind::Field, name, "", Some(data))
}

/// Link to `target` in the file `file_name`.
pub fn external_link(name: &str, file_name: &str, mut target: Path) -> MemoryNode {
    target.set_filename(file_name);
    let data = LinkData { target, link_type: LinkType::External };
    MemoryNode::new(NodeKind::Field, name, "", Some(data))
}
