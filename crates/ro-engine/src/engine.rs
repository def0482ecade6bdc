//! Executes a stored computation in place of an intercepted function body.

use tracing::debug;

use ro_core::callable::{CallBinding, OverrideValue};
use ro_core::value::Value;
use ro_core::Result;

use crate::error::invocation_setup_error;
use crate::registry::OverrideRecord;

/// Invoke `record`'s stored computation with the intercepted call's
/// arguments and receiver.
///
/// Only applicable to invocable records; the trampoline reads literal values
/// directly and never hands them to the engine. The callable is bound to the
/// record's owning scope and to `receiver` so self-referential behavior
/// inside the override resolves correctly, and `args` are forwarded
/// positionally, unmodified.
///
/// The record reads as busy for the whole call; the guard restores the
/// marker on every exit path, setup failures included. Bind failure or a
/// declared-arity mismatch yields `InvocationSetup`; errors raised by the
/// bound computation itself propagate unchanged.
pub fn execute_override(
    record: &OverrideRecord,
    args: &[Value],
    receiver: Option<Value>,
) -> Result<Value> {
    let _active = record.enter();

    let callable = match record.value() {
        OverrideValue::Invocable(callable) => callable,
        OverrideValue::Literal(_) => {
            return Err(invocation_setup_error(
                record.function().as_str(),
                "stored override value is not invocable",
            ));
        }
    };

    if let Some(arity) = callable.arity() {
        if arity != args.len() {
            return Err(invocation_setup_error(
                record.function().as_str(),
                format!(
                    "cannot forward {} arguments to a computation expecting {}",
                    args.len(),
                    arity
                ),
            ));
        }
    }

    let binding = CallBinding {
        scope: record.scope(),
        receiver,
    };
    let bound = callable
        .bind(binding)
        .map_err(|err| invocation_setup_error(record.function().as_str(), err.to_string()))?;

    debug!(function = %record.function(), "executing override");
    bound.invoke(args)
}
