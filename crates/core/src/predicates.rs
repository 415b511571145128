//! Ready-made search predicates.
//!
//! Any `FnMut(&Node<N>) -> bool` works as a predicate; these cover the
//! usual match-by-name, match-by-class and combined lookups. The plain
//! kind tests ([`is_group`](crate::is_group), [`is_field`](crate::is_field),
//! [`is_attribute`](crate::is_attribute)) can be passed directly.
use nxquery_path::GroupElement;

use crate::algorithm::get_class;
use crate::node::{ContainerNode, Node, NodeKind};

pub fn by_name<N: ContainerNode>(name: impl Into<String>) -> impl Fn(&Node<N>) -> bool {
    let name = name.into();
    move |node| node.name() == name
}

/// Groups and fields whose class attribute equals `class`. Attributes never match.
pub fn by_class<N: ContainerNode>(class: impl Into<String>) -> impl Fn(&Node<N>) -> bool {
    let class = class.into();
    move |node| get_class(node).ok().flatten().is_some_and(|value| value == class)
}

/// Partial match against a path element: an empty name or class is a wildcard.
pub fn by_element<N: ContainerNode>(pattern: GroupElement) -> impl Fn(&Node<N>) -> bool {
    move |node| {
        if pattern.has_name() && node.name() != pattern.name() {
            return false;
        }
        if !pattern.has_class() {
            return true;
        }
        get_class(node).ok().flatten().is_some_and(|value| value == pattern.class())
    }
}

pub fn kind_is<N: ContainerNode>(kind: NodeKind) -> impl Fn(&Node<N>) -> bool {
    move |node| node.kind() == kind
}
