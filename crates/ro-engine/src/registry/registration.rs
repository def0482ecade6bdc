use std::sync::Arc;

use tracing::debug;

use ro_core::callable::OverrideValue;
use ro_core::hierarchy::{Scope, TypeId};
use ro_core::ident::{FunctionKey, Ident};
use ro_core::Result;

use super::store::OverrideRecord;
use super::Registry;
use crate::error::method_not_found;

impl Registry {
    /// Register (or replace) an override for `name` under `scope`.
    ///
    /// A type scope must declare or inherit the function somewhere on its
    /// single-parent chain; otherwise the call fails with `MethodNotFound`
    /// and no record is created or modified anywhere. The global scope
    /// accepts any name.
    ///
    /// The override is additionally propagated to every consecutive ancestor
    /// that also declares or inherits the method, each propagated record
    /// sharing the same underlying value, so resolution succeeds identically
    /// whichever level of the hierarchy the trampoline observes. The returned
    /// result reports the immediate scope's own outcome; once the immediate
    /// precondition holds, every ancestor the propagation walk visits
    /// satisfies it as well.
    pub fn set_override(
        &self,
        scope: Option<TypeId>,
        name: &str,
        value: OverrideValue,
        execute_original: bool,
    ) -> Result<()> {
        let key = FunctionKey::fold(name);
        if let Some(ty) = scope {
            if !self.types().declares_or_inherits(ty, &key) {
                let scope_name = self
                    .types()
                    .name_of(ty)
                    .map(String::from)
                    .unwrap_or_else(|| "?".to_string());
                return Err(method_not_found(scope_name, name));
            }
        }

        let function = Ident::new(name);
        let shared = Arc::new(value);
        debug!(%function, ?scope, execute_original, "set override");
        self.insert_record(Scope::from(scope), &key, &function, &shared, execute_original);

        if let Some(ty) = scope {
            let mut current = ty;
            while let Some(parent) = self.types().parent_of(current) {
                if !self.types().declares_or_inherits(parent, &key) {
                    break;
                }
                self.insert_record(Scope::Type(parent), &key, &function, &shared, execute_original);
                current = parent;
            }
        }

        Ok(())
    }

    fn insert_record(
        &self,
        scope: Scope,
        key: &FunctionKey,
        function: &Ident,
        value: &Arc<OverrideValue>,
        execute_original: bool,
    ) {
        let record = Arc::new(OverrideRecord::new(
            scope,
            function.clone(),
            Arc::clone(value),
            execute_original,
        ));
        let table = self.store().table_or_create(scope);
        if table.insert(key.clone(), record).is_some() {
            debug!(%function, ?scope, "replaced existing override");
        }
    }

    /// Remove the override for `name` from `scope`'s table only; ancestors
    /// keep theirs. Returns whether a record was present.
    ///
    /// Deliberately asymmetric with `set_override`: removal does not
    /// propagate up the chain.
    pub fn unset_override(&self, scope: Option<TypeId>, name: &str) -> bool {
        let key = FunctionKey::fold(name);
        let removed = match self.store().table(Scope::from(scope)) {
            Some(table) => table.remove(&key).is_some(),
            None => false,
        };
        if removed {
            debug!(function = name, ?scope, "unset override");
        }
        removed
    }

    /// An independent copy of the stored value for introspection; `None`
    /// (silently) when no table or record exists.
    pub fn override_value(&self, scope: Option<TypeId>, name: &str) -> Option<OverrideValue> {
        self.find_override(scope, name)
            .map(|record| record.value().clone())
    }

    /// List (function, execute_original) pairs registered under `scope`.
    pub fn overrides_for(&self, scope: Option<TypeId>) -> Vec<(Ident, bool)> {
        let mut entries = Vec::new();
        if let Some(table) = self.store().table(Scope::from(scope)) {
            table.for_each(|record| {
                entries.push((record.function().clone(), record.execute_original()));
            });
        }
        entries
    }

    /// Tear down every table, releasing all stored value references.
    pub fn clear(&self) {
        debug!("clearing override store");
        self.store().clear();
    }
}
