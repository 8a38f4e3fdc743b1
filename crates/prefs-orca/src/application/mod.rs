//! Use cases of the Orca adapter.

pub mod apply_profile;
