//! Integration testing module
//!
//! End-to-end tests for the metadata store:
//! - Document round trips through memory and files
//! - Sequential key, pairing and audio map properties under mutation
//! - Per-frame dropout analysis as a consumer would run it

pub mod roundtrip;
