pub mod color;
pub mod distance;
pub mod error;
pub mod palette;
pub mod params;
pub mod pipeline;
pub mod recolor;
pub mod shepard;

pub use color::Color;
pub use error::{RecolorError, Result};
pub use palette::Palette;
pub use params::RecolorParams;
pub use pipeline::{recolor_image, recolor_rgba, recolor_with_workers};
