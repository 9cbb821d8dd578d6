//! Recipe browsing core: catalog normalization, the cook-along timer and
//! favorites, plus the HTTP service backing the favorites store.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod http;
pub mod recipes;
pub mod state;
pub mod timer;

pub use error::{CoreError, CoreResult};
