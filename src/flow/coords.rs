use crate::units::Pt;

/// A point in PDF user space (origin at the bottom-left of the page, y growing upwards)
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Coords {
    pub x: Pt,
    pub y: Pt,
}

impl Coords {
    pub fn new<X: Into<Pt>, Y: Into<Pt>>(x: X, y: Y) -> Coords {
        Coords {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Returns these coordinates moved by `dx` and `dy`
    pub fn translate(self, dx: Pt, dy: Pt) -> Coords {
        Coords {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(Pt, Pt)> for Coords {
    fn from((x, y): (Pt, Pt)) -> Self {
        Coords { x, y }
    }
}
