use docfacade::collection::Collection;
use docfacade::common::{SortOrder, Value};
use docfacade::doc;
use docfacade::errors::ErrorKind;
use docfacade::index::{IndexFields, IndexOptions};
use docfacade::FacadeBuilder;
use docfacade_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, insert_test_documents, run_test,
};

#[test]
fn test_ensure_index_lists_descriptors() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            assert!(coll.ensure_index("email", Collection::UNIQUE)?);

            let indexes = coll.get_indexes()?.to_vec()?;
            assert_eq!(indexes.len(), 2);

            let namespace = format!("{}.users", ctx.db().name());
            assert_eq!(indexes[0].get("name"), Value::from("_id_"));
            assert_eq!(indexes[0].get("key"), Value::from(doc! { "_id": 1 }));
            assert_eq!(indexes[1].get("name"), Value::from("email_1"));
            assert_eq!(indexes[1].get("key"), Value::from(doc! { email: 1 }));
            assert_eq!(indexes[1].get("ns"), Value::from(namespace));
            assert_eq!(indexes[1].get("unique"), Value::from(true));

            assert_eq!(coll.get_indexed_fields()?, vec!["_id", "email"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_ensure_index_is_idempotent() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            assert!(coll.ensure_index("email", Collection::UNIQUE)?);
            assert!(coll.ensure_index("email", Collection::UNIQUE)?);
            assert_eq!(coll.get_indexes()?.to_vec()?.len(), 2);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_compound_index_key_order() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let fields = IndexFields::new()
                .add("last_name", SortOrder::Ascending)
                .add("age", SortOrder::Descending);
            coll.ensure_index(fields, IndexOptions::default())?;

            let indexes = coll.get_indexes()?.to_vec()?;
            let compound = &indexes[1];
            assert_eq!(compound.get("name"), Value::from("last_name_1_age_-1"));
            assert_eq!(compound.get("key"), Value::from(doc! { last_name: 1, age: (-1) }));
            assert!(!compound.contains_key("unique"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unique_index_rejects_duplicate_writes() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.ensure_index("email", Collection::UNIQUE)?;

            assert!(coll.insert(doc! { email: "a@b.c" })?.is_ok());
            let result = coll.insert(doc! { email: "a@b.c" })?;
            assert!(!result.is_ok());
            assert!(result.err().unwrap().starts_with("E11000 duplicate key error"));
            assert_eq!(coll.count()?, 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unique_index_over_existing_duplicates() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            // two documents share last_name "ln2"
            assert!(!coll.ensure_index("last_name", Collection::UNIQUE)?);
            assert_eq!(coll.count()?, 3);

            assert!(coll.ensure_index("last_name", Collection::DROP_DUPLICATES)?);
            assert_eq!(coll.count()?, 2);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_legacy_boolean_unique_index() {
    run_test(
        || create_test_context_with(FacadeBuilder::new().legacy_boolean_unique_index(true)),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.ensure_unique_index("email", false)?;
            coll.insert(doc! { email: "x" })?;
            assert!(!coll.insert(doc! { email: "x" })?.is_ok());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_drop_indexes() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.ensure_index("email", Collection::UNIQUE)?;
            coll.ensure_index("age", IndexOptions::default())?;

            assert!(coll.drop_index("age")?);
            assert!(!coll.drop_index("age")?);
            assert!(!coll.drop_index("_id")?);
            assert_eq!(coll.get_indexed_fields()?, vec!["_id", "email"]);

            coll.drop_indexes()?;
            assert_eq!(coll.get_indexed_fields()?, vec!["_id"]);

            // the unique constraint is gone with its index
            coll.insert(doc! { email: "x" })?;
            assert!(coll.insert(doc! { email: "x" })?.is_ok());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_empty_index_spec_fails() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let err = coll.ensure_index(IndexFields::new(), Collection::UNIQUE).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::IndexingError);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_indexes_are_per_collection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let users = ctx.db().collection("users")?;
            let orders = ctx.db().collection("orders")?;
            users.ensure_index("email", Collection::UNIQUE)?;
            orders.ensure_index("total", IndexOptions::default())?;

            assert_eq!(users.get_indexed_fields()?, vec!["_id", "email"]);
            assert_eq!(orders.get_indexed_fields()?, vec!["_id", "total"]);

            orders.drop()?;
            assert_eq!(users.get_indexed_fields()?, vec!["_id", "email"]);
            assert!(orders.get_indexed_fields()?.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
