//! Unit tests for individual components

mod builders_test;
mod bounded_queue_test;
mod config_test;
mod error_test;
mod runtime_test;
