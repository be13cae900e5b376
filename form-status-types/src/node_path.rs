use std::fmt;

/// An absolute path to a node in the content tree, e.g. `"/Forms/f1/s1/a1"`.
///
/// Paths are slash-separated. The root is `"/"`. Every node in a tree is
/// addressed by its path, which is also how the engine remembers nodes between
/// the read and write phases of a form pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    /// Normalized path string, always starting with `/`, never ending with one
    /// unless it is the root.
    path: String,
}

impl NodePath {
    /// Create a path from a slash-separated string.
    ///
    /// Missing leading slashes are added and empty segments are dropped, so
    /// `"Forms//f1/"` becomes `"/Forms/f1"`.
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path.as_ref().split('/').filter(|s| !s.is_empty()).collect();
        Self {
            path: format!("/{}", segments.join("/")),
        }
    }

    /// The root path.
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
        }
    }

    /// Append a child segment to this path, returning a new path.
    pub fn child(&self, name: &str) -> Self {
        if name.is_empty() {
            self.clone()
        } else if self.is_root() {
            Self::new(name)
        } else {
            Self {
                path: format!("{}/{}", self.path, name.trim_matches('/')),
            }
        }
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Get the segments of this path as an iterator.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Number of segments; zero for the root.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The last segment, i.e. the node's own name. `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Get the parent path by removing the last segment.
    /// Returns `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.path.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(last_slash) => Some(Self {
                path: self.path[..last_slash].to_string(),
            }),
        }
    }

    /// Iterate over the strict ancestors of this path, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath> {
        std::iter::successors(self.parent(), NodePath::parent)
    }

    /// Check whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        if self == other {
            return false;
        }
        if self.is_root() {
            return true;
        }
        other.path.starts_with(&self.path) && other.path[self.path.len()..].starts_with('/')
    }
}

impl Default for NodePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for NodePath {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl From<&NodePath> for NodePath {
    fn from(p: &NodePath) -> Self {
        p.clone()
    }
}
