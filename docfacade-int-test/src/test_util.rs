use docfacade::collection::{Collection, Document, ObjectId};
use docfacade::doc;
use docfacade::errors::FacadeResult;
use docfacade::store::memory::InMemoryStore;
use docfacade::{Database, FacadeBuilder};
use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Runs a test between its set-up and tear-down steps.
///
/// The tear-down runs whether the test body fails or panics; the failure
/// is then reported with the backtrace captured at start.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> FacadeResult<()>,
    B: Fn() -> FacadeResult<TestContext>,
    A: Fn(TestContext) -> FacadeResult<()>,
{
    let backtrace = Backtrace::capture();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);

    let error = match outcome {
        Ok(Ok(())) => match after_result {
            Ok(()) => return,
            Err(e) => format!("After run failed: {:?}", e),
        },
        Ok(Err(e)) => format!("Test failed: {:?}", e),
        Err(panic_err) => {
            if let Some(s) = panic_err.downcast_ref::<&str>() {
                format!("Panic: {}", s)
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                format!("Panic: {}", s)
            } else {
                "Panic: unknown payload".to_string()
            }
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("{}", error);
    let bt = backtrace.to_string();
    if !bt.is_empty() && !bt.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", bt);
    }
    eprintln!("=====================================================\n");
    panic!("{}", error);
}

#[derive(Clone)]
pub struct TestContext {
    store: InMemoryStore,
    db: Database,
}

impl TestContext {
    pub fn new(store: InMemoryStore, db: Database) -> Self {
        Self { store, db }
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }

    /// The store behind the database, to open more facades over it.
    pub fn store(&self) -> InMemoryStore {
        self.store.clone()
    }
}

fn random_name() -> String {
    format!("test_{}", ObjectId::new().to_hex())
}

pub fn create_test_context() -> FacadeResult<TestContext> {
    create_test_context_with(FacadeBuilder::new())
}

pub fn create_test_context_with(builder: FacadeBuilder) -> FacadeResult<TestContext> {
    let store = InMemoryStore::new();
    let db = builder.open(store.database(&random_name()))?;
    Ok(TestContext::new(store, db))
}

pub fn cleanup(ctx: TestContext) -> FacadeResult<()> {
    let db = ctx.db();
    for name in db.collection_names()? {
        db.drop_collection(&name)?;
    }
    Ok(())
}

pub fn create_test_docs() -> Vec<Document> {
    let doc1 = doc! {
        first_name: "fn1",
        last_name: "ln1",
        age: 31,
        arr: [1, 2, 3],
        list: (vec!["one", "two", "three"]),
        address: { city: "paris", zip: "75001" },
        body: "a quick brown fox jump over the lazy dog",
    };

    let doc2 = doc! {
        first_name: "fn2",
        last_name: "ln2",
        age: 45,
        arr: [3, 4, 3],
        list: (vec!["three", "four", "five"]),
        address: { city: "london", zip: "NW1" },
        body: "quick hello world from the facade",
    };

    let doc3 = doc! {
        first_name: "fn3",
        last_name: "ln2",
        age: 27,
        arr: [9, 4, 8],
        address: { city: "london", zip: "E1" },
        body: "Lorem ipsum dolor sit amet, consectetur \
        adipiscing elit. Sed nunc mi, mattis ullamcorper \
        dignissim vitae, condimentum non lorem.",
    };

    vec![doc1, doc2, doc3]
}

pub fn insert_test_documents(collection: &Collection) -> FacadeResult<()> {
    collection.batch_insert(create_test_docs())?;
    Ok(())
}
