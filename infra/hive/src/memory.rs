//! In-process hive backend.

use crate::error::HiveError;
use crate::hive::{Hive, Key, check_writable, key_not_found, value_not_found};
use crate::path::{KeyPath, fold, validate_name};
use crate::value::{Access, Value};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
struct Node {
    path: KeyPath,
    /// Entries keyed by folded name; the original name is kept for enumeration.
    values: BTreeMap<String, (String, Value)>,
}

impl Node {
    const fn new(path: KeyPath) -> Self {
        Self { path, values: BTreeMap::new() }
    }
}

/// A hive that lives entirely in memory.
///
/// Location and entry names are matched case-insensitively, like the registry.
/// Cloning is cheap and clones share the same tree.
///
/// ```rust
/// use harden_hive::{Access, Hive, KeyPath, MemoryHive, Value};
///
/// let hive = MemoryHive::new();
/// let path = KeyPath::parse(r"Software\Policies\Explorer").unwrap();
/// hive.create(&path).unwrap().set("DisallowRun", &Value::Dword(1)).unwrap();
///
/// let key = hive.open(&path, Access::READ).unwrap();
/// assert_eq!(key.get_dword("disallowrun").unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHive {
    nodes: Arc<RwLock<BTreeMap<String, Node>>>,
}

impl MemoryHive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the whole tree as `display path -> entry name -> value`.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, Value>> {
        self.nodes
            .read()
            .values()
            .map(|node| {
                let values = node
                    .values
                    .values()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                (node.path.to_string(), values)
            })
            .collect()
    }

    /// Number of locations in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    fn handle(&self, path: &KeyPath, access: Access) -> Box<dyn Key + '_> {
        Box::new(MemoryKey { hive: self, path: path.clone(), access })
    }

    fn with_node<T>(
        &self,
        path: &KeyPath,
        f: impl FnOnce(&Node) -> Result<T, HiveError>,
    ) -> Result<T, HiveError> {
        let nodes = self.nodes.read();
        let node = nodes.get(&path.folded()).ok_or_else(|| key_not_found(path))?;
        f(node)
    }

    fn with_node_mut<T>(
        &self,
        path: &KeyPath,
        f: impl FnOnce(&mut Node) -> Result<T, HiveError>,
    ) -> Result<T, HiveError> {
        let mut nodes = self.nodes.write();
        let node = nodes.get_mut(&path.folded()).ok_or_else(|| key_not_found(path))?;
        f(node)
    }
}

impl Hive for MemoryHive {
    fn open(&self, path: &KeyPath, access: Access) -> Result<Box<dyn Key + '_>, HiveError> {
        if !self.nodes.read().contains_key(&path.folded()) {
            return Err(key_not_found(path));
        }
        Ok(self.handle(path, access))
    }

    fn create(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>, HiveError> {
        {
            let mut nodes = self.nodes.write();
            for ancestor in path.ancestry() {
                nodes.entry(ancestor.folded()).or_insert_with(|| {
                    trace!(path = %ancestor, "Location created");
                    Node::new(ancestor.clone())
                });
            }
        }
        Ok(self.handle(path, Access::ALL))
    }

    fn delete(&self, path: &KeyPath) -> Result<(), HiveError> {
        let mut nodes = self.nodes.write();
        let folded = path.folded();
        if !nodes.contains_key(&folded) {
            return Err(key_not_found(path));
        }
        if nodes.values().any(|node| path.is_ancestor_of(&node.path)) {
            return Err(HiveError::KeyNotEmpty { message: path.to_string().into(), context: None });
        }
        nodes.remove(&folded);
        trace!(path = %path, "Location deleted");
        Ok(())
    }
}

#[derive(Debug)]
struct MemoryKey<'h> {
    hive: &'h MemoryHive,
    path: KeyPath,
    access: Access,
}

impl Key for MemoryKey<'_> {
    fn path(&self) -> &KeyPath {
        &self.path
    }

    fn get(&self, name: &str) -> Result<Value, HiveError> {
        self.hive.with_node(&self.path, |node| {
            node.values
                .get(&fold(name))
                .map(|(_, value)| value.clone())
                .ok_or_else(|| value_not_found(&self.path, name))
        })
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), HiveError> {
        check_writable(self.access, &self.path)?;
        validate_name(name)?;
        self.hive.with_node_mut(&self.path, |node| {
            node.values.insert(fold(name), (name.to_owned(), value.clone()));
            Ok(())
        })
    }

    fn remove(&self, name: &str) -> Result<(), HiveError> {
        check_writable(self.access, &self.path)?;
        self.hive.with_node_mut(&self.path, |node| {
            node.values
                .remove(&fold(name))
                .map(|_| ())
                .ok_or_else(|| value_not_found(&self.path, name))
        })
    }

    fn names(&self) -> Result<Vec<String>, HiveError> {
        self.hive
            .with_node(&self.path, |node| Ok(node.values.values().map(|(n, _)| n.clone()).collect()))
    }
}
