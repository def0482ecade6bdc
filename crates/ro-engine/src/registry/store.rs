//! Pure storage for override records. No validation logic lives here.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ro_core::callable::OverrideValue;
use ro_core::collections::ConcurrentMap;
use ro_core::hierarchy::Scope;
use ro_core::ident::{FunctionKey, Ident};

/// One registered substitute for a (scope, function) pair.
///
/// The value is held behind an `Arc` because propagation registers the same
/// value against several ancestor scopes; it is released when the last
/// referencing record is dropped.
pub struct OverrideRecord {
    scope: Scope,
    function: Ident,
    value: Arc<OverrideValue>,
    execute_original: bool,
    active: AtomicUsize,
}

impl OverrideRecord {
    pub(crate) fn new(
        scope: Scope,
        function: Ident,
        value: Arc<OverrideValue>,
        execute_original: bool,
    ) -> Self {
        Self {
            scope,
            function,
            value,
            execute_original,
            active: AtomicUsize::new(0),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The overridden function's name in its original spelling.
    pub fn function(&self) -> &Ident {
        &self.function
    }

    pub fn value(&self) -> &OverrideValue {
        &self.value
    }

    /// Whether the trampoline should run the real body in addition to the
    /// substitute. Interpreted by the trampoline, not enforced here.
    pub fn execute_original(&self) -> bool {
        self.execute_original
    }

    /// True while an invocation of this record is on some call stack.
    ///
    /// The trampoline checks this before re-entering an override for the same
    /// record, to avoid unbounded recursion when the override's own
    /// computation triggers another call to the overridden function.
    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire) > 0
    }

    pub(crate) fn enter(&self) -> ActiveGuard<'_> {
        self.active.fetch_add(1, Ordering::AcqRel);
        ActiveGuard { record: self }
    }
}

impl Debug for OverrideRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideRecord")
            .field("scope", &self.scope)
            .field("function", &self.function)
            .field("value", &self.value)
            .field("execute_original", &self.execute_original)
            .field("busy", &self.is_busy())
            .finish()
    }
}

/// Marks a record as executing for the guard's lifetime.
///
/// The marker is a depth counter rather than a single bit, so it is restored
/// correctly on every exit path even under trampoline reentry or overlapping
/// calls from several threads.
pub struct ActiveGuard<'a> {
    record: &'a OverrideRecord,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.record.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Records for one scope, keyed by case-folded function name. At most one
/// record per key; insertion replaces the prior record.
pub struct OverrideTable {
    records: ConcurrentMap<FunctionKey, Arc<OverrideRecord>>,
}

impl OverrideTable {
    fn new() -> Self {
        Self {
            records: ConcurrentMap::new(),
        }
    }

    pub fn get(&self, key: &FunctionKey) -> Option<Arc<OverrideRecord>> {
        self.records.get_cloned(key)
    }

    pub(crate) fn insert(
        &self,
        key: FunctionKey,
        record: Arc<OverrideRecord>,
    ) -> Option<Arc<OverrideRecord>> {
        self.records.insert(key, record)
    }

    pub(crate) fn remove(&self, key: &FunctionKey) -> Option<Arc<OverrideRecord>> {
        self.records.remove(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&OverrideRecord),
    {
        self.records.for_each(|_, record| f(record));
    }
}

/// Scope-to-table store; tables are created lazily per scope on first
/// registration.
pub struct OverrideStore {
    tables: ConcurrentMap<Scope, Arc<OverrideTable>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self {
            tables: ConcurrentMap::new(),
        }
    }

    /// Read-only lookup; no table is created.
    pub fn table(&self, scope: Scope) -> Option<Arc<OverrideTable>> {
        self.tables.get_cloned(&scope)
    }

    pub(crate) fn table_or_create(&self, scope: Scope) -> Arc<OverrideTable> {
        self.tables
            .get_or_insert_with(scope, || Arc::new(OverrideTable::new()))
    }

    /// Tear down every table, releasing all value references.
    pub fn clear(&self) {
        self.tables.clear();
    }
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self::new()
    }
}
