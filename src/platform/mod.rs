//! Platform adapters
//!
//! Both builds get `data` (loading with a logged fallback) and `shared` (the
//! game handle event callbacks go through). The browser build adds a 2D
//! canvas `Surface` and `fetch`-based loading.

pub mod data;
pub mod shared;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod fetch;

#[cfg(not(target_arch = "wasm32"))]
pub use data::read_file;
pub use data::{cheats_or_empty, questions_or_default};
pub use shared::Shared;
