use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use memodag::{Operation, Resolver};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn redefining_a_value_does_not_purge_its_cached_state() -> TestResult {
    let engine: Resolver<i64> = Resolver::new();
    let runs = Arc::new(AtomicUsize::new(0));

    engine.define_value("base", 2);
    let r = Arc::clone(&runs);
    engine.define_operation(
        "squared",
        Operation::from_fn(["base"], move |ctx| {
            r.fetch_add(1, Ordering::SeqCst);
            Ok(ctx.args()[0] * ctx.args()[0])
        }),
    )?;

    assert_eq!(engine.resolve("squared").await?, 4);

    // Registry now says 10, but "base" already resolved to 2 and its cache
    // slot was not overwritten; new chains keep reading the cached 2.
    engine.define_value("base", 10);
    engine.define_operation(
        "doubled",
        Operation::from_fn(["base"], |ctx| Ok(ctx.args()[0] * 2)),
    )?;
    assert_eq!(engine.resolve("doubled").await?, 4);

    // "squared" itself stays memoized.
    assert_eq!(engine.resolve("squared").await?, 4);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn set_overwrites_the_cache_slot_for_fresh_chains() -> TestResult {
    let engine: Resolver<i64> = Resolver::new();

    engine.define_value("base", 2);
    engine.define_operation(
        "squared",
        Operation::from_fn(["base"], |ctx| Ok(ctx.args()[0] * ctx.args()[0])),
    )?;

    assert_eq!(engine.resolve("squared").await?, 4);

    // The explicit cache write purges "base"'s computed state...
    engine.set("base", 10);
    engine.define_operation(
        "tripled",
        Operation::from_fn(["base"], |ctx| Ok(ctx.args()[0] * 3)),
    )?;
    assert_eq!(engine.resolve("tripled").await?, 30);

    // ...but dependents that already cached their own results are untouched.
    assert_eq!(engine.resolve("squared").await?, 4);

    Ok(())
}

#[tokio::test]
async fn set_shadows_a_registered_operation() -> TestResult {
    let engine: Resolver<i64> = Resolver::new();
    let runs = Arc::new(AtomicUsize::new(0));

    engine.define_value("base", 2);
    let r = Arc::clone(&runs);
    engine.define_operation(
        "squared",
        Operation::from_fn(["base"], move |ctx| {
            r.fetch_add(1, Ordering::SeqCst);
            Ok(ctx.args()[0] * ctx.args()[0])
        }),
    )?;
    engine.define_operation(
        "plus_one",
        Operation::from_fn(["squared"], |ctx| Ok(ctx.args()[0] + 1)),
    )?;

    // The cache slot wins over the registered operation, so the body of
    // "squared" never runs.
    engine.set("squared", 100);
    assert_eq!(engine.resolve("plus_one").await?, 101);
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn last_registration_wins() -> TestResult {
    let engine: Resolver<i64> = Resolver::new();

    engine.define_operation(
        "answer",
        Operation::from_fn(Vec::<String>::new(), |_ctx| Ok(1)),
    )?;
    engine.define_operation(
        "answer",
        Operation::from_fn(Vec::<String>::new(), |_ctx| Ok(42)),
    )?;

    assert_eq!(engine.resolve("answer").await?, 42);

    Ok(())
}
