//! Target list, snapshot and console reporter tests

pub mod snapshot_tests;
