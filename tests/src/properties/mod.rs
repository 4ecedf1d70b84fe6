//! # Property Tests
//!
//! Seeded random operation sequences checked against whole-ledger
//! properties after every step.
