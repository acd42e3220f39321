//! Turns [PageContents] into PDF content stream operators.

use crate::font::Font;
use crate::page::{PageContents, SpanFont, SpanLayout};
use crate::PDFError;
use id_arena::Arena;
use std::io::Write;

pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, PDFError> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::RawContent(raw) => {
                writeln!(&mut content, "q")?;
                content.write_all(raw.as_slice())?;
                writeln!(&mut content, "\nQ")?;
            }
            PageContents::SaveState => writeln!(&mut content, "q")?,
            PageContents::RestoreState => writeln!(&mut content, "Q")?,
            PageContents::Clip(rect) => {
                writeln!(
                    &mut content,
                    "{} {} {} {} re W n",
                    rect.x1,
                    rect.y1,
                    rect.width(),
                    rect.height()
                )?;
            }
            PageContents::FillRect { rect, colour } => {
                writeln!(&mut content, "q")?;
                colour.write_fill(&mut content)?;
                writeln!(
                    &mut content,
                    "{} {} {} {} re f",
                    rect.x1,
                    rect.y1,
                    rect.width(),
                    rect.height()
                )?;
                writeln!(&mut content, "Q")?;
            }
            PageContents::Line {
                from,
                to,
                width,
                colour,
            } => {
                writeln!(&mut content, "q")?;
                colour.write_stroke(&mut content)?;
                writeln!(&mut content, "{width} w")?;
                writeln!(&mut content, "{} {} m {} {} l S", from.0, from.1, to.0, to.1)?;
                writeln!(&mut content, "Q")?;
            }
        }
    }

    Ok(content)
}

fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), PDFError> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    writeln!(content, "q")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour = first.colour;
    writeln!(
        content,
        "/F{} {} Tf",
        current_font.id.index(),
        current_font.size
    )?;
    current_colour.write_fill(content)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            writeln!(
                content,
                "/F{} {} Tf",
                current_font.id.index(),
                current_font.size
            )?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            current_colour.write_fill(content)?;
        }

        let font = &fonts[current_font.id];
        writeln!(content, "BT")?;
        writeln!(content, "{} {} Td", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        for ch in span.text.chars() {
            write!(content, "{:04x}", font.glyph_id_or_replacement(ch)?)?;
        }
        writeln!(content, "> Tj")?;
        writeln!(content, "ET")?;
    }

    writeln!(content, "Q")?;
    Ok(())
}
