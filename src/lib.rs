pub mod analytics;
pub mod format;
pub mod model;
pub mod normalize;
pub mod pools;
pub mod render;
pub mod schema;
pub mod validate;
pub mod view;

#[cfg(feature = "full")]
pub mod chains;
#[cfg(feature = "full")]
pub mod cli;
#[cfg(feature = "full")]
pub mod config;
#[cfg(feature = "full")]
pub mod dashboard;
#[cfg(feature = "full")]
pub mod fetch;

#[cfg(feature = "wasm")]
pub mod wasm;
