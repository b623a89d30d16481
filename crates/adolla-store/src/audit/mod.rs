//! Activity trail aggregate
//!
//! Immutable record of every administrative mutation. Insertion happens
//! only inside the unit of work; this module exposes reads.

pub mod entity;
pub mod repository;
