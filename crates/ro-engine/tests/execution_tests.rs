use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use ro_core::callable::{BoundCallable, CallBinding, Callable, NativeCallable, OverrideValue};
use ro_core::error::Error;
use ro_core::hierarchy::{Scope, TypeGraph};
use ro_core::value::Value;
use ro_engine::{execute_override, Registry};

fn global_registry() -> Registry {
    Registry::new(Arc::new(TypeGraph::new()))
}

fn set_invocable(registry: &Registry, name: &str, callable: impl Callable + 'static) {
    registry
        .set_override(None, name, OverrideValue::invocable(callable), false)
        .unwrap();
}

#[test]
fn arguments_are_forwarded_positionally_and_unmodified() {
    let registry = global_registry();
    set_invocable(
        &registry,
        "sum",
        NativeCallable::new("sum", |_, args| {
            Ok(Value::int(args.iter().filter_map(Value::as_int).sum()))
        }),
    );

    let record = registry.find_override(None, "sum").unwrap();
    let result = execute_override(
        &record,
        &[Value::int(1), Value::int(2), Value::int(3)],
        None,
    )
    .unwrap();
    assert_eq!(result, Value::int(6));
    assert!(!record.is_busy());
}

#[test]
fn argument_order_is_preserved() {
    let registry = global_registry();
    set_invocable(
        &registry,
        "join",
        NativeCallable::new("join", |_, args| {
            let joined = args
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(Value::string(joined))
        }),
    );

    let record = registry.find_override(None, "join").unwrap();
    let result = execute_override(
        &record,
        &[Value::string("a"), Value::int(2), Value::string("c")],
        None,
    )
    .unwrap();
    assert_eq!(result, Value::string("a 2 c"));
}

#[test]
fn callable_is_bound_to_receiver_and_owning_scope() {
    let graph = Arc::new(TypeGraph::new());
    let widget = graph.register_type("Widget", None).unwrap();
    graph.declare_method(widget, "label").unwrap();
    let registry = Registry::new(Arc::clone(&graph));

    let seen_graph = Arc::clone(&graph);
    registry
        .set_override(
            Some(widget),
            "label",
            OverrideValue::invocable(NativeCallable::new("label", move |binding, _| {
                let scope_name = binding
                    .scope
                    .type_id()
                    .and_then(|ty| seen_graph.name_of(ty))
                    .map(String::from)
                    .unwrap_or_default();
                let receiver = binding
                    .receiver
                    .as_ref()
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Ok(Value::string(format!("{scope_name}:{receiver}")))
            })),
            false,
        )
        .unwrap();

    let record = registry.find_override(Some(widget), "label").unwrap();
    let result =
        execute_override(&record, &[], Some(Value::string("instance-3"))).unwrap();
    assert_eq!(result, Value::string("Widget:instance-3"));
}

#[test]
fn literal_records_are_rejected_with_a_setup_error() {
    let registry = global_registry();
    registry
        .set_override(None, "answer", OverrideValue::literal(Value::int(42)), false)
        .unwrap();

    let record = registry.find_override(None, "answer").unwrap();
    let err = execute_override(&record, &[], None).unwrap_err();
    match err {
        Error::InvocationSetup { function, .. } => assert_eq!(function, "answer"),
        other => panic!("expected InvocationSetup, got {other}"),
    }
    assert!(!record.is_busy());
}

struct RefusesBinding;

impl Callable for RefusesBinding {
    fn bind(&self, _binding: CallBinding) -> ro_core::Result<Box<dyn BoundCallable>> {
        Err(Error::Generic("no receiver available".to_string()))
    }
}

#[test]
fn bind_failure_yields_setup_error_and_busy_is_restored() {
    let registry = global_registry();
    set_invocable(&registry, "detach", RefusesBinding);

    let record = registry.find_override(None, "detach").unwrap();
    let err = execute_override(&record, &[], None).unwrap_err();
    match err {
        Error::InvocationSetup { function, reason } => {
            assert_eq!(function, "detach");
            assert!(reason.contains("no receiver available"));
        }
        other => panic!("expected InvocationSetup, got {other}"),
    }
    assert!(!record.is_busy());
}

#[test]
fn arity_mismatch_yields_setup_error_and_busy_is_restored() {
    let registry = global_registry();
    set_invocable(
        &registry,
        "pair",
        NativeCallable::with_arity("pair", 2, |_, args| {
            Ok(Value::list(args.to_vec()))
        }),
    );

    let record = registry.find_override(None, "pair").unwrap();
    let err = execute_override(&record, &[Value::int(1)], None).unwrap_err();
    assert!(matches!(err, Error::InvocationSetup { .. }));
    assert!(!record.is_busy());

    let ok = execute_override(&record, &[Value::int(1), Value::int(2)], None).unwrap();
    assert_eq!(ok, Value::list(vec![Value::int(1), Value::int(2)]));
}

#[test]
fn computation_errors_propagate_unchanged() {
    let registry = global_registry();
    set_invocable(
        &registry,
        "explode",
        NativeCallable::new("explode", |_, _| {
            Err(Error::Generic("boom".to_string()))
        }),
    );

    let record = registry.find_override(None, "explode").unwrap();
    let err = execute_override(&record, &[], None).unwrap_err();
    match err {
        Error::Generic(message) => assert_eq!(message, "boom"),
        other => panic!("expected the computation's own error, got {other}"),
    }
    assert!(!record.is_busy());
}

#[test]
fn record_reads_busy_while_its_computation_runs() {
    let registry = Arc::new(global_registry());
    let observer = Arc::clone(&registry);
    let observed_busy = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&observed_busy);
    registry
        .set_override(
            None,
            "watch",
            OverrideValue::invocable(NativeCallable::new("watch", move |_, _| {
                let record = observer.find_override(None, "watch").unwrap();
                seen.store(record.is_busy(), Ordering::SeqCst);
                Ok(Value::unit())
            })),
            false,
        )
        .unwrap();

    let record = registry.find_override(None, "watch").unwrap();
    execute_override(&record, &[], None).unwrap();
    assert!(observed_busy.load(Ordering::SeqCst));
    assert!(!record.is_busy());
}

#[test]
fn reentrant_execution_keeps_the_marker_balanced() {
    let registry = Arc::new(global_registry());
    let inner = Arc::clone(&registry);
    let still_busy_after_inner = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&still_busy_after_inner);
    registry
        .set_override(
            None,
            "recurse",
            OverrideValue::invocable(NativeCallable::new("recurse", move |_, args| {
                let depth = args.first().and_then(Value::as_int).unwrap_or(0);
                let record = inner.find_override(None, "recurse").unwrap();
                if depth == 0 {
                    execute_override(&record, &[Value::int(1)], None)?;
                    // The outer invocation is still on the stack; a single
                    // shared bit would already have been cleared here.
                    seen.store(record.is_busy(), Ordering::SeqCst);
                }
                Ok(Value::int(depth))
            })),
            false,
        )
        .unwrap();

    let record = registry.find_override(None, "recurse").unwrap();
    execute_override(&record, &[Value::int(0)], None).unwrap();
    assert!(still_busy_after_inner.load(Ordering::SeqCst));
    assert!(!record.is_busy());
}

#[test]
fn scope_of_a_global_record_binds_as_global() {
    let registry = global_registry();
    set_invocable(
        &registry,
        "where",
        NativeCallable::new("where", |binding, _| {
            Ok(Value::bool(matches!(binding.scope, Scope::Global)))
        }),
    );

    let record = registry.find_override(None, "where").unwrap();
    assert_eq!(execute_override(&record, &[], None).unwrap(), Value::bool(true));
}
