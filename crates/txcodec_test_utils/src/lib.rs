//! Fixtures shared by the tests of the transaction codec crates.

pub mod secret_key;
