use crate::units::Pt;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred while rendering or writing
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("invalid page geometry: {0}")]
    /// The page size and margins leave no room for content
    Configuration(String),

    #[error("divider made no progress: {remaining_height} pt available, part is {part_height} pt tall")]
    /// A [Dividable](crate::flow::Dividable) returned an empty first part while content remained
    DivideContractViolation { remaining_height: Pt, part_height: Pt },

    #[error("no page is open to draw on")]
    /// The render context was closed and has no canvas
    NoOpenPage,

    #[error("page hook failed: {0}")]
    /// A page lifecycle hook aborted the render
    Hook(String),

    #[error("page missing from the document")]
    /// The page order refers to a page that is no longer in the document
    PageMissing,

    #[error("font has no unicode cmap table")]
    /// The font can't be embedded because it doesn't map characters to glyphs
    NoFontCmap,

    #[error("font has no glyph for {0:?} and no replacement glyph")]
    /// A character could not be mapped to any glyph
    MissingGlyph(char),
}
