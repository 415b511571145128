//! Structured form of a NeXus object path.
//!
//! A path has up to four parts:
//!
//! ```text
//! [file_name://][/]name:class/name/:class/..[@attribute]
//! ```
//!
//! The file part and the attribute part are optional; the leading `/` marks
//! an absolute path. Every segment of the group chain is a [`GroupElement`].
//!
//! ```
//! use nxquery_path::Path;
//!
//! let path: Path = "data.nxs:///entry:NXentry/instrument/detector@units".parse().unwrap();
//! assert_eq!(path.filename(), "data.nxs");
//! assert!(path.is_absolute());
//! assert_eq!(path.size(), 3);
//! assert_eq!(path.attribute(), "units");
//! assert_eq!(path.to_string(), "data.nxs:///entry:NXentry/instrument/detector@units");
//! ```
use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::error::{PathError, Result};

/// Name of the current-group segment.
pub const CURRENT: &str = ".";
/// Name of the parent-group segment.
pub const PARENT: &str = "..";

/// One segment of the group chain: a name, a class, or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupElement {
    name: CompactString,
    class: CompactString,
}

impl GroupElement {
    pub fn new(name: impl Into<CompactString>, class: impl Into<CompactString>) -> Self {
        Self { name: name.into(), class: class.into() }
    }

    pub fn named(name: impl Into<CompactString>) -> Self {
        Self::new(name, CompactString::default())
    }

    pub fn of_class(class: impl Into<CompactString>) -> Self {
        Self::new(CompactString::default(), class)
    }

    pub fn current() -> Self {
        Self::named(CURRENT)
    }

    pub fn parent() -> Self {
        Self::named(PARENT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_class(&self) -> bool {
        !self.class.is_empty()
    }

    pub fn is_current(&self) -> bool {
        self.name == CURRENT && self.class.is_empty()
    }

    pub fn is_parent(&self) -> bool {
        self.name == PARENT && self.class.is_empty()
    }

    pub fn is_dot(&self) -> bool {
        self.is_current() || self.is_parent()
    }

    /// Partial match with `self` acting as the pattern: an empty name or
    /// class on the pattern side matches anything.
    pub fn matches(&self, candidate: &GroupElement) -> bool {
        (self.name.is_empty() || self.name == candidate.name)
            && (self.class.is_empty() || self.class == candidate.class)
    }
}

impl fmt::Display for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.class.is_empty() {
            write!(f, ":{}", self.class)?;
        }
        Ok(())
    }
}

impl<N, C> From<(N, C)> for GroupElement
where
    N: Into<CompactString>,
    C: Into<CompactString>,
{
    fn from((name, class): (N, C)) -> Self {
        Self::new(name, class)
    }
}

pub(crate) type Elements = SmallVec<[GroupElement; 4]>;

/// Parsed NeXus path. Equality is structural over every part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    file_name: String,
    absolute: bool,
    groups: Elements,
    attribute: String,
}

impl Path {
    /// Empty relative path without file or attribute.
    pub fn new() -> Self {
        Self::default()
    }

    /// The absolute root path `/`.
    pub fn root() -> Self {
        Self { absolute: true, ..Self::default() }
    }

    /// The canonical current-group path `.`.
    pub fn current() -> Self {
        let mut path = Self::new();
        path.groups.push(GroupElement::current());
        path
    }

    pub fn from_parts<I>(
        file_name: impl Into<String>,
        absolute: bool,
        groups: I,
        attribute: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<GroupElement>,
    {
        Self {
            file_name: file_name.into(),
            absolute,
            groups: groups.into_iter().map(Into::into).collect(),
            attribute: attribute.into(),
        }
    }

    pub fn has_filename(&self) -> bool {
        !self.file_name.is_empty()
    }

    /// File name, empty if the path carries none.
    pub fn filename(&self) -> &str {
        &self.file_name
    }

    pub fn set_filename(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    pub fn has_attribute(&self) -> bool {
        !self.attribute.is_empty()
    }

    /// Attribute name, empty if the path carries none.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn set_attribute(&mut self, attribute: impl Into<String>) {
        self.attribute = attribute.into();
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        self.absolute = absolute;
    }

    /// True for a path without group elements and without attribute.
    pub fn is_root(&self) -> bool {
        self.groups.is_empty() && self.attribute.is_empty()
    }

    /// Number of group elements; file and attribute parts are not counted.
    pub fn size(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn append(&mut self, name: impl Into<CompactString>, class: impl Into<CompactString>) {
        self.groups.push(GroupElement::new(name, class));
    }

    pub fn prepend(&mut self, name: impl Into<CompactString>, class: impl Into<CompactString>) {
        self.groups.insert(0, GroupElement::new(name, class));
    }

    pub fn push(&mut self, element: GroupElement) {
        self.groups.push(element);
    }

    pub fn pop_front(&mut self) -> Result<GroupElement> {
        if self.groups.is_empty() {
            return Err(PathError::EmptyPath);
        }
        Ok(self.groups.remove(0))
    }

    pub fn pop_back(&mut self) -> Result<GroupElement> {
        self.groups.pop().ok_or(PathError::EmptyPath)
    }

    pub fn front(&self) -> Option<&GroupElement> {
        self.groups.first()
    }

    pub fn back(&self) -> Option<&GroupElement> {
        self.groups.last()
    }

    pub fn groups(&self) -> &[GroupElement] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupElement> {
        self.groups.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a GroupElement;
    type IntoIter = std::slice::Iter<'a, GroupElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_filename() {
            write!(f, "{}://", self.file_name)?;
        }
        if self.absolute {
            f.write_str("/")?;
        }
        for (index, element) in self.groups.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{element}")?;
        }
        if self.has_attribute() {
            write!(f, "@{}", self.attribute)?;
        } else if !self.absolute && self.groups.is_empty() && !self.has_filename() {
            // the empty relative path denotes the current group
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_path(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
