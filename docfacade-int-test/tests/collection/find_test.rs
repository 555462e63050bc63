use docfacade::common::{SortOrder, Value};
use docfacade::doc;
use docfacade::errors::ErrorKind;
use docfacade::store::FindOptions;
use docfacade_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_find_with_filter() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            assert_eq!(coll.find(&doc! {})?.count(), 3);
            assert_eq!(coll.find(&doc! { last_name: "ln2" })?.count(), 2);
            assert_eq!(coll.find(&doc! { "address.city": "london" })?.count(), 2);
            assert_eq!(coll.find(&doc! { arr: 4 })?.count(), 2);
            assert_eq!(coll.find(&doc! { age: { "$gt": 30, "$lt": 50 } })?.count(), 2);
            assert_eq!(coll.find(&doc! { list: { "$exists": false } })?.count(), 1);
            assert_eq!(
                coll.find(&doc! { "$or": [{ first_name: "fn1" }, { age: 27 }] })?.count(),
                2
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_find_with_options() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let options = FindOptions::new()
                .sort(doc! { age: (-1) })
                .skip(1)
                .limit(1)
                .projection(doc! { first_name: 1, "_id": 0 });
            let docs = coll.find_with_options(&doc! {}, &options)?.to_vec()?;
            assert_eq!(docs, vec![doc! { first_name: "fn1" }]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_query_builder() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let entities = coll
                .query()
                .eq("last_name", "ln2")
                .gte("age", 20)
                .sort("age", SortOrder::Ascending)
                .entities()?;
            let names: Vec<Value> = entities.iter().map(|e| e.get("first_name")).collect();
            assert_eq!(names, vec![Value::from("fn3"), Value::from("fn2")]);
            assert!(entities.iter().all(|e| e.collection_name() == Some("test")));

            assert_eq!(coll.query().in_values("first_name", vec!["fn1", "fn3"]).count()?, 2);
            assert_eq!(coll.query().ne("address.city", "london").count()?, 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_find_with_bad_operator_fails_lazily() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let mut cursor = coll.find(&doc! { age: { "$near": 1 } })?;
            let err = cursor.to_vec().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_cursor_is_a_snapshot() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let cursor = coll.find(&doc! {})?;
            coll.clear()?;
            assert_eq!(cursor.count(), 3);
            assert_eq!(coll.count()?, 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
