use docfacade::common::{Value, ERR_UNKNOWN_STAGE};
use docfacade::doc;
use docfacade::errors::ErrorKind;
use docfacade::store::ReadTimeout;
use docfacade::FacadeBuilder;
use docfacade_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, insert_test_documents, run_test,
};

#[test]
fn test_aggregate_pipeline() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let result = coll.aggregate(&[
                doc! { "$match": { "address.city": "london" } },
                doc! { "$sort": { age: 1 } },
                doc! { "$project": { first_name: 1, "_id": 0 } },
            ])?;
            assert_eq!(result, vec![doc! { first_name: "fn3" }, doc! { first_name: "fn2" }]);

            let counted = coll.aggregate(&[doc! { "$match": { last_name: "ln2" } }, doc! { "$count": "n" }])?;
            assert_eq!(counted[0].get("n"), Value::I64(2));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_aggregate_failure() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            let err = coll.aggregate(&[doc! { "$group": { "_id": "$last_name" } }]).unwrap_err();
            assert_eq!(err.aggregation_code(), Some(ERR_UNKNOWN_STAGE));
            match err.kind() {
                ErrorKind::AggregationFailed { message, .. } => assert!(message.contains("$group")),
                other => panic!("unexpected error kind {}", other),
            }
            assert!(err.message().contains("$group"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_aggregate_restores_timeout() {
    run_test(
        || create_test_context_with(FacadeBuilder::new().read_timeout(ReadTimeout::Millis(1500))),
        |ctx| {
            let coll = ctx.db().collection("test")?;
            insert_test_documents(&coll)?;

            coll.aggregate(&[doc! { "$limit": 1 }])?;
            assert_eq!(coll.timeout(), ReadTimeout::Millis(1500));

            assert!(coll.aggregate(&[doc! { "$bogus": 1 }]).is_err());
            assert_eq!(coll.timeout(), ReadTimeout::Millis(1500));

            let other = ctx.db().collection("other")?;
            other.set_timeout(ReadTimeout::Millis(10));
            assert_eq!(coll.timeout(), ReadTimeout::Millis(10));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
