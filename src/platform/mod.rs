//! Platform layer
//!
//! Implements the flow's host traits:
//! - `headless`: in-memory stage (native runs, tests)
//! - `web`: DOM elements via `web-sys` (browser only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessStage;
#[cfg(target_arch = "wasm32")]
pub use web::DomStage;
