mod aggregate_test;
mod concurrency_test;
mod entity_test;
mod find_test;
mod index_test;
mod reference_test;
mod write_test;
