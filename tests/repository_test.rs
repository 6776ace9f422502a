//! Repository behaviour over the in-memory store
//!
//! The store answers with the same status codes as Cosmos DB, so these tests
//! exercise the real outcome mapping end to end.

use cosmos_repo::adapters::memory::MemoryStore;
use cosmos_repo::core::{EntityRepository, Repository, ENTITY_CONTAINER};
use cosmos_repo::domain::{
    Deletion, Entity, Insertion, Lookup, Outcome, OutcomeKind, QueryOptions, QuerySpec,
    RepositoryError, StoreError, ENTITY_PARTITION_KEY_PATH,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use test_case::test_case;

fn entity_store() -> MemoryStore {
    MemoryStore::new("appdb").with_container(ENTITY_CONTAINER, ENTITY_PARTITION_KEY_PATH)
}

fn entities() -> EntityRepository {
    EntityRepository::for_store(Arc::new(entity_store()), 100)
}

fn entity(id: &str, partition: &str, data: &str) -> Entity {
    Entity::new(id, partition, data.to_string())
}

#[tokio::test]
async fn test_walkthrough_get_insert_delete() {
    let repo = entities();

    assert_eq!(repo.get("1", "A").await.unwrap(), Lookup::NotFound);

    let inserted = repo.insert(entity("1", "A", "x")).await.unwrap();
    assert_eq!(inserted, Insertion::Created(entity("1", "A", "x")));

    assert_eq!(repo.get("1", "A").await.unwrap(), Lookup::Ok(entity("1", "A", "x")));

    assert_eq!(repo.insert(entity("1", "A", "x")).await.unwrap(), Insertion::Conflict);

    assert_eq!(repo.delete("1", "A").await.unwrap(), Deletion::NoContent);
    assert_eq!(repo.delete("1", "A").await.unwrap(), Deletion::NotFound);
}

#[tokio::test]
async fn test_get_never_inserted_is_not_found() {
    let repo = entities();
    repo.insert(entity("1", "A", "x")).await.unwrap();

    for (id, partition) in [("2", "A"), ("1", "B"), ("", "A")] {
        assert!(repo.get(id, partition).await.unwrap().is_not_found());
    }
}

#[tokio::test]
async fn test_insert_returns_exact_input() {
    let repo = entities();
    let input = entity("42", "P", "payload");
    match repo.insert(input.clone()).await.unwrap() {
        Insertion::Created(returned) => assert_eq!(returned, input),
        Insertion::Conflict => panic!("fresh identity must not conflict"),
    }
}

#[tokio::test]
async fn test_update_replaces_observable_state() {
    let repo = entities();
    repo.insert(entity("1", "A", "before")).await.unwrap();

    let updated = repo
        .update(entity("1", "A", "after"), "1", "A")
        .await
        .unwrap();
    assert_eq!(updated, Lookup::Ok(entity("1", "A", "after")));
    assert_eq!(repo.get("1", "A").await.unwrap(), Lookup::Ok(entity("1", "A", "after")));
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let repo = entities();
    let updated = repo
        .update(entity("1", "A", "after"), "1", "A")
        .await
        .unwrap();
    assert_eq!(updated, Lookup::NotFound);
    assert_eq!(repo.get("1", "A").await.unwrap(), Lookup::NotFound);
}

#[tokio::test]
async fn test_upsert_succeeds_whether_or_not_present() {
    let repo = entities();

    let first = repo.upsert(entity("1", "A", "one")).await.unwrap();
    assert_eq!(first, entity("1", "A", "one"));

    let second = repo.upsert(entity("1", "A", "two")).await.unwrap();
    assert_eq!(second, entity("1", "A", "two"));

    assert_eq!(repo.get("1", "A").await.unwrap(), Lookup::Ok(entity("1", "A", "two")));
}

#[tokio::test]
async fn test_outcome_tags() {
    let repo = entities();

    let outcomes: Vec<OutcomeKind> = vec![
        repo.get("1", "A").await.unwrap().kind(),
        repo.insert(entity("1", "A", "x")).await.unwrap().kind(),
        repo.insert(entity("1", "A", "x")).await.unwrap().kind(),
        repo.get("1", "A").await.unwrap().kind(),
        repo.delete("1", "A").await.unwrap().kind(),
    ];

    let tags: Vec<String> = outcomes.iter().map(|k| k.to_string()).collect();
    assert_eq!(tags, ["not-found", "created", "conflict", "ok", "no-content"]);

    let widened: Outcome<Entity> = repo.get("1", "A").await.unwrap().into();
    assert_eq!(widened, Outcome::NotFound);
}

#[tokio::test]
async fn test_fatal_errors_propagate() {
    let store = MemoryStore::new("appdb");
    let repo: EntityRepository = EntityRepository::for_store(Arc::new(store), 10);

    // The container is missing: a 404 on insert is not a conflict and not absorbed
    let err = repo.insert(entity("1", "A", "x")).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Store(StoreError::Status { status: 404, .. })
    ));

    let err = repo.upsert(entity("1", "A", "x")).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_partition_mismatch_is_fatal_not_conflict() {
    let repo = entities();
    repo.insert(entity("1", "A", "x")).await.unwrap();

    let err = repo
        .update(entity("1", "A", "x"), "1", "B")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_concurrent_inserts_of_one_identity() {
    let repo = entities();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.insert(entity("same", "A", "x")).await })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            Insertion::Created(_) => created += 1,
            Insertion::Conflict => conflicts += 1,
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
}

async fn seeded(count: usize, page_size: u32) -> EntityRepository {
    let repo: EntityRepository = EntityRepository::for_store(Arc::new(entity_store()), page_size);
    for i in 0..count {
        let partition = if i % 3 == 0 { "A" } else { "B" };
        repo.insert(entity(&format!("{i:03}"), partition, "x"))
            .await
            .unwrap();
    }
    repo
}

#[test_case(10, 1 ; "single item pages")]
#[test_case(10, 3 ; "uneven last page")]
#[test_case(10, 5 ; "exact division")]
#[test_case(10, 10 ; "one full page")]
#[test_case(10, 50 ; "page larger than result")]
#[test_case(0, 4 ; "empty container")]
#[tokio::test]
async fn test_pagination_yields_every_item_once(count: usize, page_size: u32) {
    let repo = seeded(count, 100).await;

    let mut options = QueryOptions::new("SELECT * FROM c").with_max_item_count(page_size);
    let mut seen = Vec::new();
    let mut round_trips = 0;

    loop {
        let page = repo.query(&options).await.unwrap();
        round_trips += 1;
        assert!(page.values.len() <= page_size as usize);
        seen.extend(page.values.into_iter().map(|e| e.id));

        match page.continuation_token {
            Some(token) => options = options.with_continuation(Some(token)),
            None => break,
        }
    }

    let unique: BTreeSet<_> = seen.iter().cloned().collect();
    assert_eq!(seen.len(), count, "no duplicates and no omissions");
    assert_eq!(unique.len(), count);
    assert!(round_trips >= count.div_ceil(page_size as usize).max(1));
}

#[tokio::test]
async fn test_query_returns_single_page_only() {
    let repo = seeded(25, 10).await;

    let page = repo.query(&QueryOptions::new("SELECT * FROM c")).await.unwrap();
    assert_eq!(page.values.len(), 10);
    assert!(page.continuation_token.is_some());
}

#[tokio::test]
async fn test_filtered_query_over_pages() {
    let repo = seeded(30, 4).await;

    let spec = QuerySpec::new("SELECT * FROM c WHERE c.partition = @pk").with_parameter("pk", "A");
    let items = repo.collect_all(QueryOptions::new(spec)).await.unwrap();

    assert_eq!(items.len(), 10);
    assert!(items.iter().all(|e| e.partition == "A"));
}

#[tokio::test]
async fn test_page_stream_resumes_from_token() {
    let repo = seeded(9, 4).await;

    let first = repo.query(&QueryOptions::new("SELECT * FROM c")).await.unwrap();
    let rest: Vec<_> = repo
        .pages(QueryOptions::new("SELECT * FROM c").with_continuation(first.continuation_token.clone()))
        .try_collect()
        .await
        .unwrap();

    let total: usize = first.values.len() + rest.iter().map(|p| p.values.len()).sum::<usize>();
    assert_eq!(total, 9);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: String,
    customer: String,
    total: u32,
}

impl cosmos_repo::domain::Document for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.customer
    }
}

#[tokio::test]
async fn test_generic_repository_over_custom_document() {
    let store = MemoryStore::new("shop").with_container("orders", "/customer");
    let orders: Repository<Order> = Repository::new(Arc::new(store), "orders", 50);

    let order = Order {
        id: "o-1".to_string(),
        customer: "c-9".to_string(),
        total: 120,
    };
    assert!(matches!(
        orders.insert(order.clone()).await.unwrap(),
        Insertion::Created(_)
    ));
    assert_eq!(orders.get("o-1", "c-9").await.unwrap(), Lookup::Ok(order));
    assert_eq!(orders.container_name(), "orders");
    assert_eq!(orders.database_name(), "shop");
}

#[tokio::test]
async fn test_execute_stored_procedure() {
    let store = entity_store()
        .with_procedure(ENTITY_CONTAINER, "sum", |_pk, params| {
            let total: i64 = params.iter().filter_map(Value::as_i64).sum();
            Ok(Some(json!({ "total": total })))
        })
        .with_procedure(ENTITY_CONTAINER, "noop", |_pk, _params| Ok(None))
        .with_procedure(ENTITY_CONTAINER, "explode", |_pk, _params| {
            Err(StoreError::status_code(500, "script error"))
        });
    let repo: EntityRepository = EntityRepository::for_store(Arc::new(store), 10);

    let result: Lookup<Value> = repo
        .execute("sum", "A", &[json!(1), json!(2), json!(3)])
        .await
        .unwrap();
    assert_eq!(result, Lookup::Ok(json!({"total": 6})));

    let result: Lookup<Value> = repo.execute("noop", "A", &[]).await.unwrap();
    assert_eq!(result, Lookup::NotFound);

    let result: Lookup<Value> = repo.execute("missing", "A", &[]).await.unwrap();
    assert_eq!(result, Lookup::NotFound);

    let err = repo.execute::<Value>("explode", "A", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_repository_shares_one_store() {
    let store = Arc::new(entity_store());
    let repo: EntityRepository = EntityRepository::for_store(store.clone(), 10);
    let clone = repo.clone();

    repo.insert(entity("1", "A", "x")).await.unwrap();
    assert!(matches!(clone.get("1", "A").await.unwrap(), Lookup::Ok(_)));
    assert_eq!(store.document_count(ENTITY_CONTAINER).await, 1);
}
