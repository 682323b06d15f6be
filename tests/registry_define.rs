use std::error::Error;

use memodag::{
    DependencySource, Entry, OpContext, Operation, Registry, ResolveError, Resolver,
};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn lookup_distinguishes_entry_kinds() -> TestResult {
    let mut registry: Registry<i64> = Registry::new();

    registry.define_value("base", 2);
    registry.define_operation(
        "squared",
        Operation::from_fn(["base"], |ctx: OpContext<i64>| {
            Ok(ctx.args()[0] * ctx.args()[0])
        }),
    )?;

    assert!(matches!(registry.lookup("base"), Some(Entry::Value(2))));
    match registry.lookup("squared") {
        Some(Entry::Operation(op)) => assert_eq!(op.dependencies(), ["base"]),
        other => panic!("expected an operation entry, got {other:?}"),
    }
    assert!(registry.lookup("missing").is_none());

    Ok(())
}

#[test]
fn redefining_an_alias_replaces_the_entry_kind() -> TestResult {
    let mut registry: Registry<i64> = Registry::new();

    registry.define_operation(
        "thing",
        Operation::from_fn(Vec::<String>::new(), |_ctx| Ok(1)),
    )?;
    registry.define_value("thing", 9);

    assert!(matches!(registry.lookup("thing"), Some(Entry::Value(9))));

    Ok(())
}

#[test]
fn declarations_are_validated_at_definition_time() {
    let mut registry: Registry<i64> = Registry::new();

    let err = registry
        .define_operation("bad", Operation::from_fn(["", "ok"], |_ctx| Ok(0)))
        .unwrap_err();
    match err {
        ResolveError::InvalidOperation { alias, reason } => {
            assert_eq!(alias, "bad");
            assert!(reason.contains("#0"));
        }
        other => panic!("expected InvalidOperation, got {other:?}"),
    }
    assert!(registry.lookup("bad").is_none());
}

/// Source that strips a leading underscore from every declared name, the way
/// embedders might map decorated parameter names onto plain aliases.
struct UnderscoreTrim;

impl<V> DependencySource<V> for UnderscoreTrim {
    fn dependencies_of(
        &self,
        _alias: &str,
        operation: &Operation<V>,
    ) -> memodag::Result<Vec<String>> {
        Ok(operation
            .dependencies()
            .iter()
            .map(|d| d.trim_start_matches('_').to_string())
            .collect())
    }
}

#[test]
fn custom_dependency_sources_can_rewrite_declarations() -> TestResult {
    let mut registry: Registry<i64> = Registry::with_dependency_source(Box::new(UnderscoreTrim));

    registry.define_operation(
        "squared",
        Operation::from_fn(["_base"], |ctx: OpContext<i64>| {
            Ok(ctx.args()[0] * ctx.args()[0])
        }),
    )?;

    match registry.lookup("squared") {
        Some(Entry::Operation(op)) => assert_eq!(op.dependencies(), ["base"]),
        other => panic!("expected an operation entry, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn resolution_follows_the_rewritten_declaration() -> TestResult {
    let mut registry: Registry<i64> = Registry::with_dependency_source(Box::new(UnderscoreTrim));
    registry.define_value("base", 6);
    registry.define_operation(
        "squared",
        Operation::from_fn(["_base"], |ctx: OpContext<i64>| {
            Ok(ctx.args()[0] * ctx.args()[0])
        }),
    )?;

    let engine = Resolver::with_registry("engine", registry);
    assert_eq!(engine.resolve("squared").await?, 36);

    Ok(())
}
