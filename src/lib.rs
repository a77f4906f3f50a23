//! Gemfall (workspace facade crate).
//!
//! This package keeps the `gemfall::{core,engine,adapter,types}` public API
//! stable while the implementation lives in dedicated crates under
//! `crates/`.

pub use gemfall_adapter as adapter;
pub use gemfall_core as core;
pub use gemfall_engine as engine;
pub use gemfall_types as types;
