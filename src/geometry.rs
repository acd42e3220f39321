//! Page sizes, margins, and the page geometry the flow engine lays content out in.
//!
//! # Example
//!
//! ```
//! use pdf_flow::{PageGeometry, Margins, pagesize, In};
//!
//! let geometry = PageGeometry::new(pagesize::LETTER, Margins::all(In(1.0)));
//! assert_eq!(*geometry.content_width(), 6.5 * 72.0);
//! ```

use crate::rect::Rect;
use crate::units::Pt;
use crate::{Coords, PDFError};

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

/// Common paper sizes, in portrait orientation
pub mod pagesize {
    use super::PageSize;
    use crate::units::Pt;

    pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
    pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
    pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
    pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
    pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));

    /// Swap width and height so the long edge is horizontal
    pub fn landscape(size: PageSize) -> PageSize {
        if size.0 >= size.1 {
            size
        } else {
            (size.1, size.0)
        }
    }
}

/// Margins between the page edges and the content box. Flowing content never
/// crosses them: the flow engine clips every in-flow block to the content box.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins with one value for top and bottom and another for left and right
    pub fn symmetric<V: Into<Pt>, H: Into<Pt>>(vertical: V, horizontal: H) -> Margins {
        let (vertical, horizontal) = (vertical.into(), horizontal.into());
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::default()
    }

    /// Add a binding gutter: on the left for even page indices, on the right for odd ones
    pub fn with_gutter(&self, gutter: Pt, page_index: usize) -> Margins {
        let mut margins = *self;
        if page_index % 2 == 0 {
            margins.left += gutter;
        } else {
            margins.right += gutter;
        }
        margins
    }
}

/// The page size and margins that every page of a flow is created with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageGeometry {
    pub size: PageSize,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn new(size: PageSize, margins: Margins) -> PageGeometry {
        PageGeometry { size, margins }
    }

    pub fn width(&self) -> Pt {
        self.size.0
    }

    pub fn height(&self) -> Pt {
        self.size.1
    }

    /// Width available between the left and right margins
    pub fn content_width(&self) -> Pt {
        self.width() - self.margins.left - self.margins.right
    }

    /// Height available between the top and bottom margins
    pub fn content_height(&self) -> Pt {
        self.height() - self.margins.top - self.margins.bottom
    }

    /// Upper-left corner of the content box, where flowing content starts on each page
    pub fn upper_left(&self) -> Coords {
        Coords::new(self.margins.left, self.height() - self.margins.top)
    }

    /// The area inside all four margins
    pub fn content_box(&self) -> Rect {
        Rect::from_xywh(
            self.margins.left,
            self.margins.bottom,
            self.content_width(),
            self.content_height(),
        )
    }

    /// Fails if the margins leave no positive area to lay content out in
    pub fn validate(&self) -> Result<(), PDFError> {
        let (width, height) = (self.content_width(), self.content_height());
        if !(width > Pt::ZERO) || !(height > Pt::ZERO) {
            return Err(PDFError::Configuration(format!(
                "content box is {width} x {height} pt on a {} x {} pt page",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }
}
