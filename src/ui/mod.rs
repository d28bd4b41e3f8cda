//! Presentation layer: view models and plain-text rendering.
//!
//! ```text
//! CatalogState → CatalogViewModel / CityDetail → render_* → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types computed from catalog state
//! - [`renderer`]: Plain-text renderers for the shell

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_detail, render_favorites, render_results};
pub use viewmodel::{CatalogViewModel, CityDetail, FavoriteRow, ResultRow};
