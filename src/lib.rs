//! Cut-out: paint a mask over a picture and pack repeating text into whatever
//! is left unpainted, then export the placed text as SVG.
//!
//! Pipeline per change: pointer -> [`brush`] -> [`mask`] -> [`packer`] ->
//! [`compositor`] (raster preview + vector overlay) -> [`export`] on finish.
//! [`widget::CutoutWidget`] wires the stages together for a host.

pub mod brush;
pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod font;
pub mod gamma;
pub mod loader;
pub mod mask;
pub mod packer;
pub mod types;
pub mod widget;

pub use config::ConfigChange;
pub use error::Error;
pub use export::Export;
pub use widget::CutoutWidget;
