//! Helper functions shared by templates and commands

pub mod date;

pub use date::*;
