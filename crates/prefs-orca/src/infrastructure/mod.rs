//! Infrastructure implementations for the Orca adapter.

pub mod settings_file;
