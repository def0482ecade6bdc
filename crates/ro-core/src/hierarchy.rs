//! Single-parent type hierarchy.
//!
//! Types live in an explicit arena of entries addressed by `TypeId`; ancestry
//! queries walk parent links through the arena rather than chasing live
//! pointers. Each entry carries the set of method keys it declares, so
//! "declares or inherits" is a chain walk over folded keys.

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::bail;
use crate::collections::ConcurrentMap;
use crate::error::Result;
use crate::ident::{FunctionKey, Ident};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct TypeId(u32);

impl TypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The context an override is registered under: the global table, or a
/// specific owning type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub enum Scope {
    Global,
    Type(TypeId),
}

impl Scope {
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Scope::Global => None,
            Scope::Type(id) => Some(*id),
        }
    }
}

impl From<Option<TypeId>> for Scope {
    fn from(ty: Option<TypeId>) -> Self {
        match ty {
            Some(id) => Scope::Type(id),
            None => Scope::Global,
        }
    }
}

#[derive(Debug)]
struct TypeEntry {
    name: Ident,
    parent: Option<TypeId>,
    methods: HashSet<FunctionKey>,
}

pub struct TypeGraph {
    entries: RwLock<Vec<TypeEntry>>,
    index: ConcurrentMap<String, TypeId>,
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraph {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            index: ConcurrentMap::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<TypeEntry>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<TypeEntry>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        }
    }

    /// Register a type, optionally under a parent already in the graph.
    pub fn register_type(
        &self,
        name: impl Into<Ident>,
        parent: Option<TypeId>,
    ) -> Result<TypeId> {
        let name = name.into();
        if self.index.contains_key(&name.name) {
            bail!("type '{}' is already registered", name);
        }
        let mut entries = self.write();
        if let Some(parent) = parent {
            if parent.index() >= entries.len() {
                bail!("type '{}' specifies an unknown parent type", name);
            }
        }
        let id = TypeId(entries.len() as u32);
        self.index.insert(name.name.clone(), id);
        entries.push(TypeEntry {
            name,
            parent,
            methods: HashSet::new(),
        });
        Ok(id)
    }

    /// Record that `ty` declares a method with the given name.
    pub fn declare_method(&self, ty: TypeId, name: impl AsRef<str>) -> Result<()> {
        let mut entries = self.write();
        match entries.get_mut(ty.index()) {
            Some(entry) => {
                entry.methods.insert(FunctionKey::fold(name.as_ref()));
                Ok(())
            }
            None => bail!("cannot declare a method on an unknown type id"),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.index.get_cloned(&name.to_string())
    }

    pub fn name_of(&self, ty: TypeId) -> Option<Ident> {
        self.read().get(ty.index()).map(|entry| entry.name.clone())
    }

    pub fn parent_of(&self, ty: TypeId) -> Option<TypeId> {
        self.read().get(ty.index()).and_then(|entry| entry.parent)
    }

    /// Whether `ty` itself declares a method under `key`.
    pub fn declares(&self, ty: TypeId, key: &FunctionKey) -> bool {
        self.read()
            .get(ty.index())
            .is_some_and(|entry| entry.methods.contains(key))
    }

    /// Whether `ty` declares `key`, or inherits it from any ancestor on its
    /// single-parent chain.
    pub fn declares_or_inherits(&self, ty: TypeId, key: &FunctionKey) -> bool {
        let entries = self.read();
        let mut current = entries.get(ty.index());
        while let Some(entry) = current {
            if entry.methods.contains(key) {
                return true;
            }
            current = entry.parent.and_then(|parent| entries.get(parent.index()));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{Scope, TypeGraph};
    use crate::ident::FunctionKey;

    #[test]
    fn lookup_finds_registered_types() {
        let graph = TypeGraph::new();
        let base = graph.register_type("Base", None).unwrap();
        assert_eq!(graph.lookup("Base"), Some(base));
        assert_eq!(graph.lookup("Other"), None);
        assert_eq!(graph.name_of(base).unwrap().as_str(), "Base");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let graph = TypeGraph::new();
        graph.register_type("Base", None).unwrap();
        assert!(graph.register_type("Base", None).is_err());
    }

    #[test]
    fn inherited_methods_are_visible_down_the_chain() {
        let graph = TypeGraph::new();
        let base = graph.register_type("Base", None).unwrap();
        let mid = graph.register_type("Mid", Some(base)).unwrap();
        let leaf = graph.register_type("Leaf", Some(mid)).unwrap();
        graph.declare_method(base, "Render").unwrap();

        let key = FunctionKey::fold("render");
        assert!(graph.declares(base, &key));
        assert!(!graph.declares(leaf, &key));
        assert!(graph.declares_or_inherits(leaf, &key));
        assert!(graph.declares_or_inherits(mid, &key));
        assert!(!graph.declares_or_inherits(leaf, &FunctionKey::fold("missing")));
    }

    #[test]
    fn scope_converts_from_optional_type() {
        let graph = TypeGraph::new();
        let base = graph.register_type("Base", None).unwrap();
        assert_eq!(Scope::from(None), Scope::Global);
        assert_eq!(Scope::from(Some(base)).type_id(), Some(base));
    }
}
