//! Flowing layout for PDF documents: content blocks are placed one below the other
//! and split across as many pages as they need.
//!
//! See [flow] for the layout engine and [elements] for ready-made blocks.

mod colour;
pub use colour::*;

pub(crate) mod content;

mod document;
pub use document::*;

/// Blocks of content that can be drawn by the flow engine
pub mod elements;

mod error;
pub use error::*;

/// Paginating content blocks onto pages
pub mod flow;
pub use flow::Coords;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

/// Utility functions to measure and wrap text
pub mod layout;

mod page;
pub use page::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom content generation
pub use pdf_writer;
