//! Domain entities of the Orca adapter.

pub mod document;
