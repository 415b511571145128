//! Pure operations over [`Path`] values.
use crate::error::{PathError, Result};
use crate::model::{GroupElement, Path};

/// Cut the group chain at `index`.
///
/// The prefix keeps the file name and the absolute flag, the suffix is
/// relative and keeps the attribute name.
pub fn split(path: &Path, index: usize) -> Result<(Path, Path)> {
    if index > path.size() {
        return Err(PathError::IndexOutOfRange { index, size: path.size() });
    }
    let (head, tail) = path.groups().split_at(index);
    let prefix = Path::from_parts(path.filename(), path.is_absolute(), head.iter().cloned(), "");
    let suffix = Path::from_parts("", false, tail.iter().cloned(), path.attribute());
    Ok((prefix, suffix))
}

/// Express `child` relative to `parent`.
///
/// Both paths must be absolute and `child` must not be shorter than `parent`.
/// Only the sizes are compared; the caller decides whether `parent` really
/// is a prefix of `child` (see [`is_prefix`]).
///
/// ```
/// use nxquery_path::{make_relative, Path};
///
/// let parent: Path = "/a/b".parse().unwrap();
/// let child: Path = "/a/b/c/d".parse().unwrap();
/// assert_eq!(make_relative(&parent, &child).unwrap().to_string(), "c/d");
/// assert_eq!(make_relative(&parent, &parent).unwrap(), Path::current());
/// ```
pub fn make_relative(parent: &Path, child: &Path) -> Result<Path> {
    if !parent.is_absolute() || !child.is_absolute() {
        return Err(PathError::value("paths must be absolute"));
    }
    if parent.size() > child.size() {
        return Err(PathError::value("child must not be shorter than parent"));
    }
    if parent.size() == child.size() {
        return Ok(Path::current());
    }
    let tail = child.groups()[parent.size()..].iter().cloned();
    Ok(Path::from_parts("", false, tail, child.attribute()))
}

/// Element-wise prefix test. File names are ignored, the absolute flags must agree.
pub fn is_prefix(parent: &Path, child: &Path) -> bool {
    parent.is_absolute() == child.is_absolute()
        && parent.size() <= child.size()
        && parent.iter().zip(child.iter()).all(|(a, b)| a == b)
}

/// Resolve `.` and `..` segments lexically.
///
/// `..` consumes the preceding named segment. On an absolute path a `..`
/// at the root stays at the root; on a relative path leading `..` segments
/// are kept. A relative path that collapses to nothing becomes `.`.
pub fn normalize(path: &Path) -> Path {
    let mut elements: Vec<GroupElement> = Vec::with_capacity(path.size());
    for element in path {
        if element.is_current() {
            continue;
        }
        if element.is_parent() {
            if elements.last().is_some_and(|last| !last.is_parent()) {
                elements.pop();
            } else if !path.is_absolute() {
                elements.push(element.clone());
            }
            continue;
        }
        elements.push(element.clone());
    }

    let mut normalized =
        Path::from_parts(path.filename(), path.is_absolute(), elements, path.attribute());
    if !normalized.is_absolute() && normalized.is_empty() {
        normalized.push(GroupElement::current());
    }
    normalized
}

/// Append the relative path `tail` to `base`.
pub fn join(base: &Path, tail: &Path) -> Result<Path> {
    if tail.is_absolute() {
        return Err(PathError::value("cannot join an absolute path"));
    }
    if tail.has_filename() {
        return Err(PathError::value("cannot join a path with a file name"));
    }
    if base.has_attribute() {
        return Err(PathError::value("cannot extend a path that ends in an attribute"));
    }
    let elements = base.iter().chain(tail.iter()).cloned();
    Ok(Path::from_parts(base.filename(), base.is_absolute(), elements, tail.attribute()))
}
