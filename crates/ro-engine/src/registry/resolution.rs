use std::sync::Arc;

use ro_core::hierarchy::{Scope, TypeId};
use ro_core::ident::FunctionKey;

use super::store::OverrideRecord;
use super::Registry;

impl Registry {
    /// Resolve the override applicable to a call about to run.
    ///
    /// This is the single entry point the call-interception trampoline
    /// consults before running a function body, passing the observed scope
    /// and name of that function. Returns `None` when no table exists for
    /// the scope or the table holds no record under the case-folded name.
    pub fn find_override(
        &self,
        scope: Option<TypeId>,
        name: &str,
    ) -> Option<Arc<OverrideRecord>> {
        let table = self.store().table(Scope::from(scope))?;
        table.get(&FunctionKey::fold(name))
    }
}
