use docfacade::collection::{DocumentRef, Entity};
use docfacade::common::Value;
use docfacade::doc;
use docfacade::errors::ErrorKind;
use docfacade::FacadeBuilder;
use docfacade_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_create_and_follow_reference() {
    run_test(
        || create_test_context(),
        |ctx| {
            let db = ctx.db();
            let authors = db.collection("authors")?;
            let books = db.collection("books")?;

            let ada = authors.save(&Entity::from_raw(doc! { name: "ada" }))?.unwrap();
            let reference = authors.create_ref(ada.raw_data())?.expect("document has an id");
            assert_eq!(reference.collection(), "authors");

            books.insert(doc! { title: "notes", author: (reference.clone()) })?;
            let book = books.query().eq("title", "notes").entities()?.remove(0);

            // resolvable from any collection of the database
            let author = books.get_ref(book.get("author"))?.expect("a reference");
            assert_eq!(author.raw_data(), ada.raw_data());
            assert_eq!(author.collection_name(), Some("authors"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_reference_by_textual_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let authors = ctx.db().collection("authors")?;
            let ada = authors.save(&Entity::from_raw(doc! { name: "ada" }))?.unwrap();
            let hex = ada.id().unwrap().object_id().to_hex();

            let author = authors.get_ref(doc! { "$ref": "authors", "$id": hex })?.unwrap();
            assert_eq!(author.get("name"), Value::from("ada"));

            let err = authors.get_ref(doc! { "$ref": "authors", "$id": "nope" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidIdentifier);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_dangling_and_malformed_references() {
    run_test(
        || create_test_context(),
        |ctx| {
            let authors = ctx.db().collection("authors")?;

            let dangling = DocumentRef::new("authors", docfacade::collection::ObjectId::new());
            let resolved = authors.get_ref(dangling)?.expect("well-formed reference");
            assert!(resolved.is_empty());

            assert_eq!(authors.get_ref(doc! { "$id": 1 })?, None);
            assert_eq!(authors.get_ref(Value::from(42))?, None);
            assert_eq!(authors.get_ref(Value::Null)?, None);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_reference_into_other_database() {
    run_test(
        || create_test_context(),
        |ctx| {
            let other = FacadeBuilder::new().open(ctx.store().database("elsewhere"))?;
            let remote = other.collection("authors")?;
            let ada = remote.save(&Entity::from_raw(doc! { name: "ada" }))?.unwrap();

            let reference = DocumentRef::new("authors", ada.get("_id")).with_database("elsewhere");
            let local = ctx.db().collection("authors")?;
            assert!(local.get_ref(reference)?.unwrap().is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_ref_edge_cases() {
    run_test(
        || create_test_context(),
        |ctx| {
            let authors = ctx.db().collection("authors")?;
            assert_eq!(authors.create_ref(Value::Null)?, None);
            assert_eq!(authors.create_ref(doc! { name: "no id" })?, None);

            let by_scalar = authors.create_ref("custom-id")?.unwrap();
            assert_eq!(by_scalar.id(), &Value::from("custom-id"));
            assert_eq!(
                Value::from(by_scalar),
                Value::from(doc! { "$ref": "authors", "$id": "custom-id" })
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
