//! Application layer: the filter and schedule engines and the `CatalogService`
//! that drives them over the storage ports.
//!
//! Engines are pure over their inputs (plus a `Clock` for open-now checks);
//! the service owns the stores and serializes every entity write.

pub mod catalog;
pub mod filter;
pub mod schedule;
