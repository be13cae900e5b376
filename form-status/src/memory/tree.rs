use std::collections::{BTreeMap, HashMap};

use form_status_types::{
    ChangeSet, IDENTIFIER, NodeKind, NodePath, NodeStore, PRIMARY_TYPE, Property, PropertyValue,
    ReadSession, STATUS_FLAGS, StatusFlags, TreeError,
};
use uuid::Uuid;

/// The primary type given to the root and to untyped nodes.
pub const UNSTRUCTURED_TYPE: &str = "nt:unstructured";

#[derive(Debug, Clone, PartialEq)]
struct MemoryNode {
    primary_type: String,
    properties: BTreeMap<String, Property>,
    children: Vec<String>,
}

impl MemoryNode {
    fn new(primary_type: &str) -> Self {
        Self {
            primary_type: primary_type.to_string(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

/// A content tree held in memory.
///
/// Children keep their insertion order. Every node added through `add_node`
/// gets a random `jcr:uuid`, and identifiers resolve back to paths.
///
/// ```rust
/// use form_status::memory::MemoryTree;
/// use form_status::{NodePath, NodeStore, ReadSession, FORM_TYPE};
///
/// let mut tree = MemoryTree::new();
/// let form = tree.add_node(&NodePath::root(), "f1", FORM_TYPE).unwrap();
/// let id = tree.identifier(&form).unwrap().unwrap();
/// assert_eq!(tree.resolve_identifier(&id).unwrap(), Some(form));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: HashMap<NodePath, MemoryNode>,
    identifiers: HashMap<String, NodePath>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// A tree with only an unstructured root.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::from([(NodePath::root(), MemoryNode::new(UNSTRUCTURED_TYPE))]),
            identifiers: HashMap::new(),
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Add a child node with a fresh random identifier.
    pub fn add_node(&mut self, parent: &NodePath, name: &str, primary_type: &str) -> Result<NodePath, TreeError> {
        self.add_node_with_id(parent, name, primary_type, &Uuid::new_v4().to_string())
    }

    /// Add a child node with the given identifier.
    pub fn add_node_with_id(
        &mut self,
        parent: &NodePath,
        name: &str,
        primary_type: &str,
        identifier: &str,
    ) -> Result<NodePath, TreeError> {
        let path = self.add_untracked(parent, name, primary_type)?;
        self.set_property(&path, IDENTIFIER, Property::reference(identifier))?;
        Ok(path)
    }

    fn add_untracked(&mut self, parent: &NodePath, name: &str, primary_type: &str) -> Result<NodePath, TreeError> {
        let node = self.node_mut(parent)?;
        if node.children.iter().any(|c| c == name) {
            return Err(TreeError::DuplicateChild {
                path: parent.clone(),
                name: name.to_string(),
            });
        }
        node.children.push(name.to_string());
        let path = parent.child(name);
        self.nodes.insert(path.clone(), MemoryNode::new(primary_type));
        Ok(path)
    }

    /// Remove a node and everything below it.
    pub fn remove_node(&mut self, path: &NodePath) -> Result<(), TreeError> {
        let Some(parent) = path.parent() else {
            return Err(TreeError::backend(anyhow::anyhow!("The root cannot be removed")));
        };
        let name = path.name().unwrap_or_default().to_string();
        self.node(path)?;
        self.node_mut(&parent)?.children.retain(|c| *c != name);

        let removed: Vec<NodePath> = self
            .nodes
            .keys()
            .filter(|p| *p == path || path.is_ancestor_of(p))
            .cloned()
            .collect();
        for p in removed {
            self.nodes.remove(&p);
        }
        self.identifiers.retain(|_, p| p != path && !path.is_ancestor_of(p));
        Ok(())
    }

    /// Set a property. Shorthand for `ChangeSet::set_property`.
    pub fn set(&mut self, path: &NodePath, name: &str, property: impl Into<Property>) -> Result<(), TreeError> {
        self.set_property(path, name, property.into())
    }

    /// The stored status flags of a node; empty if it has none.
    pub fn status_flags(&self, path: &NodePath) -> StatusFlags {
        self.nodes
            .get(path)
            .and_then(|n| n.properties.get(STATUS_FLAGS))
            .map(StatusFlags::from_property)
            .unwrap_or_default()
    }

    pub fn primary_type(&self, path: &NodePath) -> Option<&str> {
        self.nodes.get(path).map(|n| n.primary_type.as_str())
    }

    /// Check whether the subtree at `path` is identical in both trees.
    pub fn subtree_eq(&self, other: &MemoryTree, path: &NodePath) -> bool {
        match (self.nodes.get(path), other.nodes.get(path)) {
            (Some(a), Some(b)) => {
                a == b && a.children.iter().all(|c| self.subtree_eq(other, &path.child(c)))
            }
            (None, None) => true,
            _ => false,
        }
    }

    fn node(&self, path: &NodePath) -> Result<&MemoryNode, TreeError> {
        self.nodes
            .get(path)
            .ok_or_else(|| TreeError::NodeNotFound(path.clone()))
    }

    fn node_mut(&mut self, path: &NodePath) -> Result<&mut MemoryNode, TreeError> {
        self.nodes
            .get_mut(path)
            .ok_or_else(|| TreeError::NodeNotFound(path.clone()))
    }
}

impl NodeStore for MemoryTree {
    fn exists(&self, path: &NodePath) -> bool {
        self.nodes.contains_key(path)
    }

    fn kind(&self, path: &NodePath) -> Result<NodeKind, TreeError> {
        Ok(NodeKind::from_primary_type(&self.node(path)?.primary_type))
    }

    fn child_names(&self, path: &NodePath) -> Result<Vec<String>, TreeError> {
        Ok(self.node(path)?.children.clone())
    }

    fn property(&self, path: &NodePath, name: &str) -> Result<Option<Property>, TreeError> {
        let node = self.node(path)?;
        if name == PRIMARY_TYPE {
            return Ok(Some(Property::single(node.primary_type.as_str())));
        }
        Ok(node.properties.get(name).cloned())
    }
}

impl ChangeSet for MemoryTree {
    fn set_property(&mut self, path: &NodePath, name: &str, property: Property) -> Result<(), TreeError> {
        if name == PRIMARY_TYPE {
            let primary_type = match property.first() {
                Some(PropertyValue::String(t)) => t.clone(),
                other => {
                    return Err(TreeError::TypeMismatch {
                        path: path.clone(),
                        name: name.to_string(),
                        expected: "String",
                        actual: other.map_or("nothing", PropertyValue::type_name),
                    });
                }
            };
            self.node_mut(path)?.primary_type = primary_type;
            return Ok(());
        }
        if name == IDENTIFIER {
            let identifier = property.first().and_then(PropertyValue::as_str).map(str::to_string);
            self.node(path)?;
            self.identifiers.retain(|_, p| p != path);
            if let Some(identifier) = identifier {
                self.identifiers.insert(identifier, path.clone());
            }
        }
        self.node_mut(path)?.properties.insert(name.to_string(), property);
        Ok(())
    }

    fn remove_property(&mut self, path: &NodePath, name: &str) -> Result<(), TreeError> {
        if name == IDENTIFIER {
            self.identifiers.retain(|_, p| p != path);
        }
        self.node_mut(path)?.properties.remove(name);
        Ok(())
    }
}

impl ReadSession for MemoryTree {
    fn resolve_identifier(&self, identifier: &str) -> Result<Option<NodePath>, TreeError> {
        Ok(self.identifiers.get(identifier).cloned())
    }
}
