//! Measuring and wrapping text.
//!
//! Layout only needs glyph advances and vertical font metrics, which are provided
//! through [TextMetrics]. [Font](crate::Font) implements it from its font tables.
//!
//! # Example
//!
//! ```
//! use pdf_flow::layout::{wrap_lines, TextMetrics};
//! use pdf_flow::Pt;
//!
//! /// Every glyph is half an em wide
//! struct Monospace;
//!
//! impl TextMetrics for Monospace {
//!     fn advance(&self, _ch: char, size: Pt) -> Pt {
//!         size * 0.5
//!     }
//!     fn ascent(&self, size: Pt) -> Pt {
//!         size * 0.8
//!     }
//!     fn descent(&self, size: Pt) -> Pt {
//!         size * -0.2
//!     }
//!     fn leading(&self, _size: Pt) -> Pt {
//!         Pt(0.0)
//!     }
//! }
//!
//! let lines = wrap_lines("Hello, world!", &Monospace, Pt(10.0), Some(Pt(40.0)));
//! assert_eq!(lines, vec!["Hello,", "world!"]);
//! ```

mod text;

pub use text::*;
