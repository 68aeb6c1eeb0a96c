//! Sequence allocator tests against a real database.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use futures::future::join_all;
use sqlx::PgPool;

use srrobot_api::db::SequenceAllocator;
use srrobot_core::Sequence;

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_first_allocation_is_one(pool: PgPool) {
    let allocator = SequenceAllocator::new(&pool);

    assert_eq!(allocator.current(Sequence::Product).await.unwrap(), 0);
    assert_eq!(allocator.next(Sequence::Product).await.unwrap(), 1);
    assert_eq!(allocator.next(Sequence::Product).await.unwrap(), 2);
    assert_eq!(allocator.current(Sequence::Product).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_allocations_are_distinct(pool: PgPool) {
    let allocator = SequenceAllocator::new(&pool);
    allocator.next(Sequence::Category).await.unwrap();

    let values: Vec<i64> = join_all((0..20).map(|_| allocator.next(Sequence::Category)))
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    let distinct: HashSet<i64> = values.iter().copied().collect();
    assert_eq!(distinct.len(), values.len());
    assert!(values.iter().all(|v| *v > 1));
    assert_eq!(allocator.current(Sequence::Category).await.unwrap(), 21);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_counters_are_independent(pool: PgPool) {
    let allocator = SequenceAllocator::new(&pool);

    allocator.next(Sequence::Customer).await.unwrap();
    allocator.next(Sequence::Customer).await.unwrap();

    assert_eq!(allocator.next(Sequence::Staff).await.unwrap(), 1);
    assert_eq!(allocator.current(Sequence::Customer).await.unwrap(), 2);
}
