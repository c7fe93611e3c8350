//! Shared models, errors, and I/O utilities for the barq workspace.

pub mod errors;
pub mod models;
pub mod utils;
