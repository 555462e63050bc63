use docfacade::collection::{DocumentId, Entity, Identifier};
use docfacade::common::Value;
use docfacade::doc;
use docfacade::errors::ErrorKind;
use docfacade::store::{SaveOptions, WriteConcern};
use docfacade_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_save_then_find_by_every_identifier_form() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let entity = Entity::from_raw(doc! { name: "ada", age: 36 });

            let saved = coll.save(&entity)?.expect("save accepted");
            let id = saved.id().expect("native id assigned");
            assert!(entity.id().is_none());

            let native = id.object_id();
            for form in [
                Identifier::from(id),
                Identifier::from(native),
                Identifier::from(native.to_hex()),
            ] {
                let found = coll.find_one(form)?;
                assert_eq!(found.raw_data(), saved.raw_data());
                assert_eq!(found.collection_name(), Some("users"));
            }

            assert_eq!(coll.find_one_raw(id)?, Some(saved.raw_data().clone()));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_repeated_save_keeps_identity() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let saved = coll.save(&Entity::from_raw(doc! { name: "ada" }))?.unwrap();

            let mut changed = saved.clone();
            changed.set("name", "ada lovelace");
            changed.set("profile.born", 1815);
            let resaved = coll.save(&changed)?.unwrap();

            assert_eq!(resaved.id(), saved.id());
            assert_eq!(coll.count()?, 1);
            let found = coll.find_one(saved.id().unwrap())?;
            assert_eq!(found.get("name"), Value::from("ada lovelace"));
            assert_eq!(found.get("profile.born"), Value::from(1815));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_find_one_missing_document() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let found = coll.find_one(DocumentId::new())?;
            assert!(found.is_empty());
            assert_eq!(coll.find_one_raw(DocumentId::new())?, None);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_invalid_identifier_text() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            for text in ["", "xyz", "5f1d7a2b9c8e4f3a2b1c0d9", "zz1d7a2b9c8e4f3a2b1c0d9e"] {
                let err = coll.find_one(text).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::InvalidIdentifier);
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_rejected_save_leaves_entity_untouched() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            coll.ensure_unique_index("email", false)?;
            coll.save(&Entity::from_raw(doc! { email: "a@b.c" }))?;

            let clash = Entity::from_raw(doc! { email: "a@b.c", name: "other" });
            assert_eq!(coll.save(&clash)?, None);
            assert_eq!(clash, Entity::from_raw(doc! { email: "a@b.c", name: "other" }));
            assert_eq!(coll.count()?, 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_unacknowledged_save() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let options = SaveOptions::new(true, WriteConcern::Unacknowledged);
            let saved = coll.save_with(&Entity::from_raw(doc! { name: "ada" }), &options)?;
            assert!(saved.is_some());
            assert_eq!(coll.count()?, 1);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_remove_by_entity_and_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            let coll = ctx.db().collection("users")?;
            let ada = coll.save(&Entity::from_raw(doc! { name: "ada" }))?.unwrap();
            let bob = coll.save(&Entity::from_raw(doc! { name: "bob" }))?.unwrap();
            coll.insert(doc! { "_id": "custom", name: "eve" })?;

            assert_eq!(coll.remove(&ada)?.n(), 1);
            assert_eq!(coll.remove(bob.id().unwrap())?.n(), 1);
            assert_eq!(coll.remove(Entity::from_raw(doc! { "_id": "custom" }))?.n(), 1);
            assert_eq!(coll.count()?, 0);

            let err = coll.remove(Entity::from_raw(doc! { name: "nobody" })).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidIdentifier);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
