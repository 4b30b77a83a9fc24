//! Sea route CLI library.
//!
//! Command handlers, dataset loading and output helpers behind the
//! `searoute` binary.

pub mod commands;
pub mod data;
pub mod output;
