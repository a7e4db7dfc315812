pub mod common;
pub mod image;
pub mod result;
pub mod status;
pub mod style;
pub mod text;

pub use common::*;
pub use image::*;
pub use result::*;
pub use status::*;
pub use style::*;
pub use text::*;
