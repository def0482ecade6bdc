//! Bindable computations stored in override records.
//!
//! A `Callable` is a capability: it is bound to the owning scope and the
//! receiver of the intercepted call, and the resulting `BoundCallable` is
//! invoked with the call's positional arguments. This keeps the engine free
//! of any particular closure mechanism; hosts supply their own `Callable`
//! implementations, with `NativeCallable` as the common one.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::error::Result;
use crate::hierarchy::Scope;
use crate::ident::Ident;
use crate::value::Value;

/// Scope and receiver a callable is bound to before invocation.
#[derive(Debug, Clone)]
pub struct CallBinding {
    /// The scope the override was registered under.
    pub scope: Scope,
    /// The instance the intercepted call was made on, if any.
    pub receiver: Option<Value>,
}

pub trait Callable: Send + Sync {
    /// Declared positional arity; `None` accepts any argument count.
    fn arity(&self) -> Option<usize> {
        None
    }

    /// Bind to a scope and receiver, producing an invocable computation.
    fn bind(&self, binding: CallBinding) -> Result<Box<dyn BoundCallable>>;
}

pub trait BoundCallable: Send + Sync {
    fn invoke(&self, args: &[Value]) -> Result<Value>;
}

type NativeFn = dyn Fn(&CallBinding, &[Value]) -> Result<Value> + Send + Sync;

/// A host-provided computation behind an `Arc<dyn Fn>`, the common
/// `Callable` implementation.
pub struct NativeCallable {
    name: Ident,
    arity: Option<usize>,
    func: Arc<NativeFn>,
}

impl NativeCallable {
    pub fn new(
        name: impl Into<Ident>,
        func: impl Fn(&CallBinding, &[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity: None,
            func: Arc::new(func),
        }
    }

    pub fn with_arity(
        name: impl Into<Ident>,
        arity: usize,
        func: impl Fn(&CallBinding, &[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity: Some(arity),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }
}

impl Debug for NativeCallable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeCallable")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Callable for NativeCallable {
    fn arity(&self) -> Option<usize> {
        self.arity
    }

    fn bind(&self, binding: CallBinding) -> Result<Box<dyn BoundCallable>> {
        Ok(Box::new(BoundNative {
            binding,
            func: Arc::clone(&self.func),
        }))
    }
}

struct BoundNative {
    binding: CallBinding,
    func: Arc<NativeFn>,
}

impl BoundCallable for BoundNative {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        (self.func)(&self.binding, args)
    }
}

/// The stored substitute for an overridden function: either a literal value
/// the trampoline uses directly, or a bindable computation for the engine.
#[derive(Clone)]
pub enum OverrideValue {
    Literal(Value),
    Invocable(Arc<dyn Callable>),
}

impl OverrideValue {
    pub fn literal(value: Value) -> Self {
        OverrideValue::Literal(value)
    }

    pub fn invocable(callable: impl Callable + 'static) -> Self {
        OverrideValue::Invocable(Arc::new(callable))
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            OverrideValue::Literal(value) => Some(value),
            OverrideValue::Invocable(_) => None,
        }
    }

    pub fn as_invocable(&self) -> Option<&Arc<dyn Callable>> {
        match self {
            OverrideValue::Literal(_) => None,
            OverrideValue::Invocable(callable) => Some(callable),
        }
    }

    pub fn is_invocable(&self) -> bool {
        matches!(self, OverrideValue::Invocable(_))
    }
}

impl Debug for OverrideValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OverrideValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            OverrideValue::Invocable(_) => f.debug_tuple("Invocable").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CallBinding, Callable, NativeCallable};
    use crate::hierarchy::Scope;
    use crate::value::Value;

    #[test]
    fn bound_native_callable_sees_its_binding() {
        let callable = NativeCallable::new("echo_receiver", |binding, _args| {
            Ok(binding.receiver.clone().unwrap_or(Value::Unit))
        });
        let bound = callable
            .bind(CallBinding {
                scope: Scope::Global,
                receiver: Some(Value::string("instance")),
            })
            .unwrap();
        assert_eq!(bound.invoke(&[]).unwrap(), Value::string("instance"));
    }
}
