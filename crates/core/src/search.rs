//! Predicate-driven tree search.
//!
//! The traversal is an explicit worklist rather than recursion: every
//! pending entry remembers its depth, and the canonical absolute paths of the
//! objects on the current branch are kept on a stack. A link that points back
//! into its own branch is cut there silently, a dangling link contributes
//! nothing. Nodes reached through a link carry the link's name. Results come
//! out in pre-order.
//!
//! ```
//! use nxquery_core::memory::{field, group, root};
//! use nxquery_core::{Node, is_field, search};
//!
//! let tree = root("scan.nxs")
//!     .child(
//!         group("entry", "NXentry")
//!             .child(field("title"))
//!             .child(group("data", "NXdata").child(field("x"))),
//!     )
//!     .build();
//! let fields = search(&Node::new(tree), is_field, true);
//! let names: Vec<_> = fields.iter().map(|n| n.name()).collect();
//! assert_eq!(names, ["title", "x"]);
//! ```
use std::iter::FusedIterator;

use nxquery_path::Path;
use smallvec::SmallVec;

use crate::algorithm::get_path;
use crate::node::{ContainerNode, Node, follow};

/// Ordered search result, in traversal order.
pub type MatchSet<N> = Vec<Node<N>>;

/// Traversal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    recursive: bool,
    max_depth: Option<usize>,
    include_attributes: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { recursive: true, max_depth: None, include_attributes: false }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Without recursion only the start node and its direct children are visited.
    pub fn with_recursion(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Nodes deeper than `depth` below the start node are not visited.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Visit the attributes of every expanded group or field right after the node itself.
    pub fn with_attributes(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn include_attributes(&self) -> bool {
        self.include_attributes
    }

    fn expands(&self, depth: usize) -> bool {
        (self.recursive || depth == 0) && self.max_depth.is_none_or(|max| depth < max)
    }
}

#[derive(Debug)]
struct Pending<N> {
    handle: N,
    depth: usize,
}

/// Lazy search over a container tree.
///
/// Yields every node accepted by the predicate. Dropping the iterator stops
/// the traversal.
pub struct Search<N, P> {
    predicate: P,
    options: SearchOptions,
    worklist: Vec<Pending<N>>,
    branch: SmallVec<[Path; 8]>,
    visited: usize,
    matched: usize,
}

impl<N, P> Search<N, P>
where
    N: ContainerNode,
    P: FnMut(&Node<N>) -> bool,
{
    pub fn new(start: &Node<N>, predicate: P, options: SearchOptions) -> Self {
        Self {
            predicate,
            options,
            worklist: vec![Pending { handle: start.handle().clone(), depth: 0 }],
            branch: SmallVec::new(),
            visited: 0,
            matched: 0,
        }
    }

    /// Number of nodes tested so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    fn expand(&mut self, node: &Node<N>, depth: usize) {
        if !self.options.expands(depth) {
            return;
        }
        let (handle, children) = match node {
            Node::Group(handle) => (handle, handle.children()),
            Node::Field(handle) => (handle, Vec::new()),
            Node::Attribute(_) => return,
        };
        // reversed so the first child is popped first
        for child in children.into_iter().rev() {
            self.worklist.push(Pending { handle: child, depth: depth + 1 });
        }
        if self.options.include_attributes {
            for attribute in handle.attributes().into_iter().rev() {
                self.worklist.push(Pending { handle: attribute, depth: depth + 1 });
            }
        }
    }
}

impl<N, P> Iterator for Search<N, P>
where
    N: ContainerNode,
    P: FnMut(&Node<N>) -> bool,
{
    type Item = Node<N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Pending { handle, depth }) = self.worklist.pop() {
            let Some(target) = follow(handle) else { continue };
            let node = Node::new(target);
            let Ok(key) = get_path(&Node::new(node.handle().canonical())) else {
                tracing::debug!(name = %node.name(), "invalid node skipped");
                continue;
            };

            self.branch.truncate(depth);
            if self.branch.contains(&key) {
                tracing::debug!(path = %key, depth, "cycle detected, branch cut");
                continue;
            }
            tracing::trace!(path = %key, depth, "visiting");
            self.branch.push(key);
            self.visited += 1;

            let accepted = (self.predicate)(&node);
            self.expand(&node, depth);
            if accepted {
                self.matched += 1;
                return Some(node);
            }
        }
        tracing::trace!(visited = self.visited, matched = self.matched, "search finished");
        None
    }
}

impl<N, P> FusedIterator for Search<N, P>
where
    N: ContainerNode,
    P: FnMut(&Node<N>) -> bool,
{
}

/// Collect every node below (and including) `start` accepted by `predicate`.
///
/// With `recursive` false only `start` and its direct children are tested.
pub fn search<N, P>(start: &Node<N>, predicate: P, recursive: bool) -> MatchSet<N>
where
    N: ContainerNode,
    P: FnMut(&Node<N>) -> bool,
{
    search_with(start, predicate, SearchOptions::new().with_recursion(recursive))
}

pub fn search_with<N, P>(start: &Node<N>, predicate: P, options: SearchOptions) -> MatchSet<N>
where
    N: ContainerNode,
    P: FnMut(&Node<N>) -> bool,
{
    Search::new(start, predicate, options).collect()
}
