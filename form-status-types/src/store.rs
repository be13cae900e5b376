use crate::{NodeKind, NodePath, Property, PropertyValue, TreeError};

/// The property holding a node's stable identifier.
pub const IDENTIFIER: &str = "jcr:uuid";

/// The property holding a node's primary type.
pub const PRIMARY_TYPE: &str = "jcr:primaryType";

/// Read access to a content tree.
///
/// The engine only ever addresses nodes by path. Implementations decide how
/// paths map onto their storage; the in-memory tree in `form-status` is one.
pub trait NodeStore {
    /// Check if a node exists at the given path.
    fn exists(&self, path: &NodePath) -> bool;

    /// The kind of the node at the given path.
    fn kind(&self, path: &NodePath) -> Result<NodeKind, TreeError>;

    /// Names of the direct children, in the store's order.
    fn child_names(&self, path: &NodePath) -> Result<Vec<String>, TreeError>;

    /// Get a property, or `None` if the node doesn't have it.
    fn property(&self, path: &NodePath, name: &str) -> Result<Option<Property>, TreeError>;

    /// Check if the node has the named property.
    fn has_property(&self, path: &NodePath, name: &str) -> Result<bool, TreeError> {
        Ok(self.property(path, name)?.is_some())
    }

    // === Convenience accessors ===

    /// Get the first value of a string property.
    fn string_property(&self, path: &NodePath, name: &str) -> Result<Option<String>, TreeError> {
        match first_value(self, path, name)? {
            Some(PropertyValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(path, name, "String", &other)),
            None => Ok(None),
        }
    }

    /// Get the first value of a long property.
    fn long_property(&self, path: &NodePath, name: &str) -> Result<Option<i64>, TreeError> {
        match first_value(self, path, name)? {
            Some(PropertyValue::Long(l)) => Ok(Some(l)),
            Some(other) => Err(mismatch(path, name, "Long", &other)),
            None => Ok(None),
        }
    }

    /// Get the first value of a boolean property.
    ///
    /// The strings `"true"` and `"false"` are accepted too, as content loaders
    /// often store booleans that way.
    fn bool_property(&self, path: &NodePath, name: &str) -> Result<Option<bool>, TreeError> {
        match first_value(self, path, name)? {
            Some(PropertyValue::Boolean(b)) => Ok(Some(b)),
            Some(PropertyValue::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(PropertyValue::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(mismatch(path, name, "Boolean", &other)),
            None => Ok(None),
        }
    }

    /// Get the identifier stored in a reference property.
    ///
    /// Plain strings are accepted as weak references.
    fn reference_property(&self, path: &NodePath, name: &str) -> Result<Option<String>, TreeError> {
        match first_value(self, path, name)? {
            Some(PropertyValue::Reference(id) | PropertyValue::String(id)) => Ok(Some(id)),
            Some(other) => Err(mismatch(path, name, "Reference", &other)),
            None => Ok(None),
        }
    }

    /// The node's stable identifier, if it has one.
    fn identifier(&self, path: &NodePath) -> Result<Option<String>, TreeError> {
        self.reference_property(path, IDENTIFIER)
    }
}

fn first_value<S: NodeStore + ?Sized>(
    store: &S,
    path: &NodePath,
    name: &str,
) -> Result<Option<PropertyValue>, TreeError> {
    Ok(store
        .property(path, name)?
        .and_then(|p| p.first().cloned()))
}

fn mismatch(path: &NodePath, name: &str, expected: &'static str, actual: &PropertyValue) -> TreeError {
    TreeError::TypeMismatch {
        path: path.clone(),
        name: name.to_string(),
        expected,
        actual: actual.type_name(),
    }
}

/// View a store trait object as a plain `NodeStore`.
///
/// Implemented for every sized `NodeStore`, so implementors never write it.
pub trait AsNodeStore {
    fn as_node_store(&self) -> &dyn NodeStore;
}

impl<T: NodeStore> AsNodeStore for T {
    fn as_node_store(&self) -> &dyn NodeStore {
        self
    }
}

/// The mutable, in-flight state of a commit.
///
/// Writes are only visible inside the commit until the host finalizes it.
pub trait ChangeSet: NodeStore + AsNodeStore {
    /// Set (or replace) a property on an existing node.
    fn set_property(&mut self, path: &NodePath, name: &str, property: Property) -> Result<(), TreeError>;

    /// Remove a property; removing a missing property is not an error.
    fn remove_property(&mut self, path: &NodePath, name: &str) -> Result<(), TreeError>;
}

/// A read-only session used for metadata lookups (questionnaires, questions).
pub trait ReadSession: NodeStore + AsNodeStore {
    /// Resolve a stable identifier to the path of the node carrying it.
    fn resolve_identifier(&self, identifier: &str) -> Result<Option<NodePath>, TreeError>;
}
