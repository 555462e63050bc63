use docfacade::collection::{Collection, Entity};
use docfacade::doc;
use docfacade::store::ReadTimeout;
use docfacade::FacadeBuilder;
use docfacade_int_test::test_util::{cleanup, create_test_context_with, run_test};
use std::thread;

#[test]
fn test_concurrent_writers() {
    run_test(
        || create_test_context_with(FacadeBuilder::new()),
        |ctx| {
            let coll = ctx.db().collection("events")?;
            coll.ensure_index("seq", Collection::UNIQUE)?;

            let handles: Vec<_> = (0..8)
                .map(|worker| {
                    let coll = coll.clone();
                    thread::spawn(move || {
                        for i in 0..50 {
                            let seq = worker * 1000 + i;
                            let saved = coll.save(&Entity::from_raw(doc! { seq: seq })).unwrap();
                            assert!(saved.is_some());
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(coll.count()?, 400);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_concurrent_aggregations_restore_timeout() {
    run_test(
        || create_test_context_with(FacadeBuilder::new().read_timeout(ReadTimeout::Millis(5000))),
        |ctx| {
            let coll = ctx.db().collection("events")?;
            coll.batch_insert((0..20).map(|i| doc! { n: i }).collect())?;

            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let coll = coll.clone();
                    thread::spawn(move || {
                        for _ in 0..25 {
                            let result = coll.aggregate(&[doc! { "$match": { n: { "$gte": 10 } } }]).unwrap();
                            assert_eq!(result.len(), 10);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(coll.timeout(), ReadTimeout::Millis(5000));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
