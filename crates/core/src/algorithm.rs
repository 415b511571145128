//! Generic algorithms over [`Node`].
//!
//! Every function matches the three node kinds exhaustively. Operations that
//! are meaningless for a kind fail with [`NodeError::Type`] instead of
//! silently returning a default.
use nxquery_path::{GroupElement, Path};

use crate::error::{NodeError, Result};
use crate::node::{ContainerNode, Node, NodeKind, follow};

pub fn is_group<N: ContainerNode>(node: &Node<N>) -> bool {
    matches!(node, Node::Group(_))
}

pub fn is_field<N: ContainerNode>(node: &Node<N>) -> bool {
    matches!(node, Node::Field(_))
}

pub fn is_attribute<N: ContainerNode>(node: &Node<N>) -> bool {
    matches!(node, Node::Attribute(_))
}

pub fn is_valid<N: ContainerNode>(node: &Node<N>) -> bool {
    node.is_valid()
}

pub fn get_name<N: ContainerNode>(node: &Node<N>) -> Result<String> {
    ensure_valid(node)?;
    Ok(node.name())
}

/// True if the class attribute of a group or field equals `class`. A missing
/// class attribute is not an error.
pub fn is_class<N: ContainerNode>(node: &Node<N>, class: &str) -> Result<bool> {
    Ok(get_class(node)?.is_some_and(|value| value == class))
}

pub fn get_class<N: ContainerNode>(node: &Node<N>) -> Result<Option<String>> {
    match node {
        Node::Group(handle) | Node::Field(handle) => Ok(handle.class_attribute()),
        Node::Attribute(_) => Err(NodeError::unsupported("class lookup", NodeKind::Attribute)),
    }
}

/// Parent of a node.
///
/// The root group is its own parent. For an attribute the parent is the
/// group or field it is attached to.
pub fn get_parent<N: ContainerNode>(node: &Node<N>) -> Result<Node<N>> {
    ensure_valid(node)?;
    match node {
        Node::Group(handle) => match handle.parent() {
            Some(parent) => live_parent(handle, parent),
            None => Ok(node.clone()),
        },
        Node::Field(handle) | Node::Attribute(handle) => match handle.parent() {
            Some(parent) => live_parent(handle, parent),
            None => {
                Err(NodeError::invalid(format!("{} '{}' is detached", node.kind(), handle.name())))
            }
        },
    }
}

fn live_parent<N: ContainerNode>(child: &N, parent: N) -> Result<Node<N>> {
    if parent.is_valid() {
        Ok(Node::new(parent))
    } else {
        Err(NodeError::invalid(format!("parent of '{}' no longer exists", child.name())))
    }
}

/// First child of `group` matching `name` and/or `class`.
///
/// An empty criterion is ignored, but at least one must be given. Names are
/// matched against the entries of the group, classes against the objects
/// behind them. A child reached through a link keeps the link's name;
/// dangling links never match.
pub fn get_child<N: ContainerNode>(group: &Node<N>, name: &str, class: &str) -> Result<Node<N>> {
    let handle = match group {
        Node::Group(handle) => handle,
        Node::Field(_) | Node::Attribute(_) => {
            return Err(NodeError::unsupported("child lookup", group.kind()));
        }
    };
    if name.is_empty() && class.is_empty() {
        return Err(NodeError::value("child lookup needs a name or a class"));
    }
    ensure_valid(group)?;

    for entry in handle.children() {
        if !name.is_empty() && entry.name() != name {
            continue;
        }
        let Some(child) = follow(entry) else { continue };
        if !child.is_valid() {
            continue;
        }
        if class.is_empty() || child.class_attribute().as_deref() == Some(class) {
            return Ok(Node::new(child));
        }
    }
    Err(NodeError::key(handle.name(), GroupElement::new(name, class).to_string()))
}

/// Attribute `name` of a group or field.
pub fn get_attribute<N: ContainerNode>(node: &Node<N>, name: &str) -> Result<Node<N>> {
    let handle = match node {
        Node::Group(handle) | Node::Field(handle) => handle,
        Node::Attribute(_) => {
            return Err(NodeError::unsupported("attribute lookup", NodeKind::Attribute));
        }
    };
    if name.is_empty() {
        return Err(NodeError::value("attribute lookup needs a name"));
    }
    ensure_valid(node)?;
    handle
        .attributes()
        .into_iter()
        .find(|attribute| attribute.name() == name)
        .map(Node::new)
        .ok_or_else(|| NodeError::key(handle.name(), format!("@{name}")))
}

/// Absolute path of a node, classes included. Attributes end in `@name`.
/// A node opened through a link is located at the link entry.
pub fn get_path<N: ContainerNode>(node: &Node<N>) -> Result<Path> {
    ensure_valid(node)?;
    let (mut current, attribute) = match node {
        Node::Group(handle) | Node::Field(handle) => (handle.clone(), String::new()),
        Node::Attribute(handle) => {
            let host = handle.parent().ok_or_else(|| {
                let name = handle.name();
                NodeError::invalid(format!("host of attribute '{name}' no longer exists"))
            })?;
            (host, handle.name())
        }
    };

    let mut path =
        Path::from_parts(current.filename(), true, Vec::<GroupElement>::new(), attribute);
    while let Some(parent) = current.parent() {
        path.prepend(current.name(), current.class_attribute().unwrap_or_default());
        current = parent;
    }
    Ok(path)
}

/// Walk `path` starting from `start`.
///
/// Absolute paths start at the root of `start`'s container. `.` stays in
/// place, `..` moves to the parent, every other element is looked up with
/// [`get_child`] and a trailing attribute with [`get_attribute`].
pub fn get_object<N: ContainerNode>(start: &Node<N>, path: &Path) -> Result<Node<N>> {
    if path.has_filename() {
        let own = start.handle().filename();
        if own != path.filename() {
            return Err(NodeError::value(format!(
                "path refers to file '{}', not '{own}'",
                path.filename()
            )));
        }
    }

    let mut current = if path.is_absolute() { get_root(start)? } else { start.clone() };
    for element in path {
        tracing::trace!(%element, at = %current.name(), "resolving path element");
        current = if element.is_current() {
            current
        } else if element.is_parent() {
            get_parent(&current)?
        } else {
            get_child(&current, element.name(), element.class())?
        };
    }
    if path.has_attribute() {
        current = get_attribute(&current, path.attribute())?;
    }
    Ok(current)
}

/// Root group of the container `node` belongs to.
pub fn get_root<N: ContainerNode>(node: &Node<N>) -> Result<Node<N>> {
    let mut current = node.clone();
    loop {
        let parent = get_parent(&current)?;
        if parent == current {
            return Ok(current);
        }
        current = parent;
    }
}

fn ensure_valid<N: ContainerNode>(node: &Node<N>) -> Result<()> {
    if node.is_valid() {
        Ok(())
    } else {
        Err(NodeError::invalid(format!("{} '{}' no longer exists", node.kind(), node.name())))
    }
}
