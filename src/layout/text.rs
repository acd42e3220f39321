use crate::units::Pt;

const TABSIZE: usize = 4;

/// Font measurements needed to lay out text, scaled to a font size.
pub trait TextMetrics {
    /// Horizontal advance of `ch`
    fn advance(&self, ch: char, size: Pt) -> Pt;

    /// Distance from the baseline to the top of the tallest glyphs
    fn ascent(&self, size: Pt) -> Pt;

    /// Distance from the baseline to the bottom of the lowest glyphs, usually negative
    fn descent(&self, size: Pt) -> Pt;

    /// Extra space the font asks for between lines
    fn leading(&self, size: Pt) -> Pt;

    /// Distance between the baselines of consecutive lines
    fn line_height(&self, size: Pt) -> Pt {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }
}

/// Calculates the vertical offset from the top of a line to the font's baseline.
///
/// In PDF, text coordinates specify the baseline position. Adding this to the
/// y-coordinate of a line's top gives where its text must be placed.
pub fn baseline_offset(metrics: &dyn TextMetrics, size: Pt) -> Pt {
    -metrics.ascent(size)
}

/// Total advance of `text` on a single line
pub fn width_of_text(text: &str, metrics: &dyn TextMetrics, size: Pt) -> Pt {
    text.chars().map(|ch| metrics.advance(ch, size)).sum()
}

/// Breaks text into lines no wider than `max_width`.
///
/// Tabs become spaces and all newline styles start a new line. Lines wrap at the most
/// recent whitespace, which is dropped at the break; a word wider than the whole line
/// is split between characters instead. Every line holds at least one character, so a
/// single glyph wider than `max_width` still overflows. Without a max width only
/// explicit newlines break.
///
/// Empty text has no lines at all.
pub fn wrap_lines(
    text: &str,
    metrics: &dyn TextMetrics,
    size: Pt,
    max_width: Option<Pt>,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let text = text
        .replace('\t', &" ".repeat(TABSIZE))
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        match max_width {
            Some(max_width) => wrap_line(source_line, metrics, size, max_width, &mut lines),
            None => lines.push(source_line.trim_end().to_string()),
        }
    }
    lines
}

fn wrap_line(
    source_line: &str,
    metrics: &dyn TextMetrics,
    size: Pt,
    max_width: Pt,
    lines: &mut Vec<String>,
) {
    let mut line = String::new();
    let mut width = Pt::ZERO;
    // byte offset in `line` just past its latest whitespace
    let mut last_break: Option<usize> = None;
    let mut wrapped = false;

    for ch in source_line.chars() {
        let advance = metrics.advance(ch, size);

        if ch.is_whitespace() {
            if line.is_empty() && wrapped {
                continue;
            }
            if width + advance > max_width {
                lines.push(line.trim_end().to_string());
                line.clear();
                width = Pt::ZERO;
                last_break = None;
                wrapped = true;
                continue;
            }
            line.push(ch);
            width += advance;
            last_break = Some(line.len());
            continue;
        }

        while width + advance > max_width && !line.is_empty() {
            let carried = match last_break.take() {
                Some(at) => line.split_off(at),
                None => String::new(),
            };
            lines.push(line.trim_end().to_string());
            line = carried;
            width = width_of_text(&line, metrics, size);
            wrapped = true;
        }
        line.push(ch);
        width += advance;
    }

    if !line.is_empty() || !wrapped {
        lines.push(line.trim_end().to_string());
    }
}
