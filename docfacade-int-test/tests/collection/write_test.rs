use docfacade::common::Value;
use docfacade::doc;
use docfacade::store::{multi, upsert, FindAndModifyOptions, InsertOptions, UpdateOptions, WriteConcern};
use docfacade::FacadeBuilder;
use docfacade_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, insert_test_documents, run_test,
};

#[test]
fn test_insert_and_batch_insert() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            let result = coll.insert(doc! { first_name: "solo" })?;
            assert!(result.is_ok());
            assert_eq!(result.n(), 1);

            let result = coll.batch_insert(vec![doc! { a: 1 }, doc! { a: 2 }])?;
            assert_eq!(result.n(), 2);
            assert_eq!(coll.count()?, 3);
            assert!(ctx.db().has_collection("test")?);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_insert_duplicate_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            coll.insert(doc! { "_id": 1, a: 1 })?;
            let result = coll.insert(doc! { "_id": 1, a: 2 })?;
            assert!(!result.is_ok());
            assert!(result.err().unwrap().contains("$_id_"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unacknowledged_writes() {
    run_test(
        || create_test_context_with(FacadeBuilder::new().write_concern(WriteConcern::Unacknowledged)),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            coll.insert(doc! { "_id": 1 })?;
            let result = coll.insert(doc! { "_id": 1 })?;
            // the failure is not reported back
            assert!(result.is_ok());
            assert!(!result.is_acknowledged());

            let acknowledged = InsertOptions::new(WriteConcern::Acknowledged(1));
            assert!(!coll.insert_with(doc! { "_id": 1 }, &acknowledged)?.is_ok());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_operators() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let result = coll.update(&doc! { first_name: "fn1" }, &doc! { "$set": { age: 32 }, "$push": { arr: 4 } })?;
            assert_eq!(result.n(), 1);
            let fn1 = coll.find(&doc! { first_name: "fn1" })?.to_vec()?;
            assert_eq!(fn1[0].get("age"), Value::from(32));
            assert_eq!(fn1[0].get("arr"), Value::from(vec![1, 2, 3, 4]));

            // a plain update touches the first match only
            let result = coll.update(&doc! { last_name: "ln2" }, &doc! { "$inc": { age: 1 } })?;
            assert_eq!(result.n(), 1);

            let result = coll.update_with_options(&doc! { last_name: "ln2" }, &doc! { "$unset": { body: "" } }, &multi())?;
            assert_eq!(result.n(), 2);
            assert_eq!(coll.count_matching(&doc! { body: { "$exists": true } })?, 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_upsert() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            let result = coll.update_with_options(&doc! { email: "a@b.c" }, &doc! { "$set": { visits: 1 } }, &upsert())?;
            assert!(result.upserted().is_some());

            let docs = coll.find(&doc! {})?.to_vec()?;
            assert_eq!(docs.len(), 1);
            assert_eq!(docs[0].get("email"), Value::from("a@b.c"));
            assert_eq!(docs[0].get("visits"), Value::from(1));

            let result = coll.update_with_options(&doc! { email: "a@b.c" }, &doc! { "$inc": { visits: 1 } }, &upsert())?;
            assert!(result.upserted().is_none());
            assert_eq!(coll.find(&doc! {})?.to_vec()?[0].get("visits"), Value::from(2));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_replacement_update_rejected_with_multi() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;
            let options = UpdateOptions::new(false, true, WriteConcern::default());
            let result = coll.update_with_options(&doc! {}, &doc! { replaced: true }, &options)?;
            assert!(!result.is_ok());
            assert_eq!(coll.count_matching(&doc! { replaced: true })?, 0);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_find_and_modify() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let options = FindAndModifyOptions::new().sort(doc! { age: 1 }).return_new(true);
            let entity = coll.find_and_modify(
                &doc! { last_name: "ln2" },
                &doc! { "$set": { claimed: true } },
                &doc! { first_name: 1, claimed: 1, "_id": 0 },
                &options,
            )?;
            assert_eq!(entity.raw_data(), &doc! { first_name: "fn3", claimed: true });
            assert_eq!(entity.collection_name(), Some("test"));

            let removed = coll.find_and_modify(
                &doc! { claimed: true },
                &doc! {},
                &doc! {},
                &FindAndModifyOptions::new().remove(true),
            )?;
            assert_eq!(removed.get("first_name"), Value::from("fn3"));
            assert_eq!(coll.count()?, 2);

            let nothing = coll.find_and_modify(&doc! { claimed: true }, &doc! { "$set": { a: 1 } }, &doc! {}, &FindAndModifyOptions::new())?;
            assert!(nothing.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_clear_keeps_indexes_drop_does_not() {
    run_test(
        || create_test_context(),
        |ctx| {
            let db = ctx.db();
            let coll = db.collection("test")?;
            insert_test_documents(&coll)?;
            coll.ensure_index("first_name", docfacade::collection::Collection::UNIQUE)?;

            assert_eq!(coll.clear()?.n(), 3);
            assert_eq!(coll.count()?, 0);
            assert_eq!(coll.get_indexed_fields()?, vec!["_id", "first_name"]);

            assert!(coll.drop()?);
            assert!(!db.has_collection("test")?);
            assert!(coll.get_indexed_fields()?.is_empty());
            assert!(!coll.drop()?);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
