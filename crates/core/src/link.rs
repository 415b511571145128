use std::fmt;

use nxquery_path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    Valid,
    Dangling,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// Link to another location in the same file.
    Internal,
    /// Link into a different file; the target path carries the file name.
    External,
    Soft,
    Hard,
}

/// Snapshot of a link entry as reported by the container.
///
/// Re-querying the container may return a different value if the
/// underlying file changed in between.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    link_path: Path,
    target_path: Path,
    status: LinkStatus,
    link_type: LinkType,
}

impl Link {
    pub fn new(
        link_path: Path,
        target_path: Path,
        status: LinkStatus,
        link_type: LinkType,
    ) -> Self {
        Self { link_path, target_path, status, link_type }
    }

    /// Name of the link entry, the last element of its path.
    pub fn name(&self) -> &str {
        self.link_path.back().map(|element| element.name()).unwrap_or_default()
    }

    pub fn link_path(&self) -> &Path {
        &self.link_path
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    pub fn is_dangling(&self) -> bool {
        self.status == LinkStatus::Dangling
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.link_path, self.target_path)
    }
}
