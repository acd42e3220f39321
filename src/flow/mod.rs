//! Flowing layout: drawing blocks one below the other and breaking them across pages.
//!
//! A [RenderContext] keeps a cursor inside the content box of the current page. Each
//! [Drawable] handed to [RenderContext::draw] is placed at the cursor, which then moves
//! down by the block's height. When a block is taller than the space left on the page it
//! is divided, either by the block itself when it implements [Dividable] or by a
//! content-blind [Cutter], and the remainder continues on a new page.
//!
//! Pages come from a [Backend]; [PdfBackend] turns each of them into a [Page](crate::Page)
//! for a [Document](crate::Document). [PageHooks] run as pages open and close.

mod canvas;
mod context;
mod coords;
mod divide;
mod drawable;
mod pdf;

pub use canvas::*;
pub use context::*;
pub use coords::*;
pub use divide::*;
pub use drawable::*;
pub use pdf::*;
