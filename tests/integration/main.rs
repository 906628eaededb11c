//! Integration tests for the mapsync plugin engine.

mod builtin_test;
mod dispatch_test;
mod helpers;
mod lifecycle_test;
mod operation_test;
