//! Integration tests for Duet.
//!
//! The suites under `tests/` drive the public APIs of every crate together:
//! regression vectors for both chains, keystore and mnemonic round trips,
//! and malformed or hostile inputs that must fail cleanly.

pub mod helpers;
