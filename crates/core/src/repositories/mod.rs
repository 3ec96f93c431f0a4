//! Persistent stores over [`crate::Storage`].
//!
//! Each store loads its collection once when opened, serves reads from memory, and writes the
//! whole collection back on every mutation. When that write fails the in-memory collection is
//! restored, so a store never holds state its storage does not.

pub mod current;
pub mod patients;
pub mod records;
pub mod templates;
