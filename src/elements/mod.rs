//! Ready-made blocks to feed a [RenderContext](crate::flow::RenderContext).

mod page_numbers;
mod paragraph;
mod shapes;

pub use page_numbers::*;
pub use paragraph::*;
pub use shapes::*;
