use crate::layout::TextMetrics;
use crate::refs::{ObjectReferences, RefType};
use crate::{PDFError, Pt};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, Face, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// A parsed TTF or OTF font. Fonts are embedded in their entirety.
///
/// Fonts live in the [Document](crate::Document) and are referred to by their id;
/// text layout only needs a `&Font` for measuring (see [TextMetrics]).
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn scaling(&self, size: Pt) -> f32 {
        *size / self.face().units_per_em() as f32
    }

    fn find_name(&self, name_id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.find_name(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.find_name(owned_ttf_parser::name_id::FAMILY)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}')
    }

    /// The glyph for `ch`, falling back to U+FFFD and then `?`
    pub fn glyph_id_or_replacement(&self, ch: char) -> Result<u16, PDFError> {
        self.glyph_id(ch)
            .or_else(|| self.replacement_glyph_id())
            .or_else(|| self.glyph_id('?'))
            .ok_or(PDFError::MissingGlyph(ch))
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        id: Id<Font>,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let font_index = id.index();
        let font_id = refs.alloc(RefType::Font(font_index));
        let glyphs = self.glyph_chars()?;
        let cid_font_id = self.write_cid(refs, font_index, &glyphs, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, &glyphs, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
        Ok(())
    }

    /// Map of every glyph reachable through a unicode cmap to its first character
    fn glyph_chars(&self) -> Result<HashMap<u16, char>, PDFError> {
        let cmap = self.face().tables().cmap.ok_or(PDFError::NoFontCmap)?;
        let mut map: HashMap<u16, char> = HashMap::new();
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint| {
                let Ok(ch) = char::try_from(codepoint) else {
                    return;
                };
                if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                    map.entry(index.0).or_insert(ch);
                }
            });
        }
        Ok(map)
    }

    /// Horizontal advance and height of each glyph, in font units
    fn glyph_sizes(&self, glyphs: &HashMap<u16, char>) -> HashMap<u16, (u16, i16)> {
        let face = self.face();
        glyphs
            .keys()
            .filter_map(|&gid| {
                let glyph = owned_ttf_parser::GlyphId(gid);
                let advance = face.glyph_hor_advance(glyph)?;
                let height = face
                    .glyph_bounding_box(glyph)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                Some((gid, (advance, height)))
            })
            .collect()
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let sizes = self.glyph_sizes(glyphs);
        let descriptor_id = self.write_descriptor(refs, font_index, &sizes, writer);
        let id = refs.alloc(RefType::CidFont(font_index));
        let scaling = 1000.0 / self.face().units_per_em() as f32;

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        // the most common advance becomes the default width
        let mut counts: HashMap<u16, usize> = HashMap::new();
        for &(advance, _) in sizes.values() {
            *counts.entry(advance).or_default() += 1;
        }
        let default_width = counts
            .into_iter()
            .max_by_key(|&(advance, count)| (count, advance))
            .map(|(advance, _)| advance as f32 * scaling)
            .unwrap_or(1000.0);

        let mut widths: Vec<(u16, f32)> = sizes
            .iter()
            .map(|(&gid, &(advance, _))| (gid, advance as f32 * scaling))
            .collect();
        widths.sort_by_key(|&(gid, _)| gid);

        let mut width_array = cid_font.widths();
        let mut run: Vec<f32> = Vec::new();
        let mut run_start: u16 = 0;
        for (gid, width) in widths {
            if !run.is_empty() && gid as usize != run_start as usize + run.len() {
                width_array.consecutive(run_start, run.drain(..));
            }
            if run.is_empty() {
                run_start = gid;
            }
            run.push(width);
        }
        if !run.is_empty() {
            width_array.consecutive(run_start, run);
        }
        width_array.finish();

        cid_font.default_width(default_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        sizes: &HashMap<u16, (u16, i16)>,
        writer: &mut Pdf,
    ) -> Ref {
        let data_id = refs.alloc(RefType::FontData(font_index));
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let max_width = sizes.values().map(|&(w, _)| w).max().unwrap_or_default() as f32;
        let max_height = sizes.values().map(|&(_, h)| h).max().unwrap_or_default() as f32;
        let avg_width = if sizes.is_empty() {
            0.0
        } else {
            sizes.values().map(|&(w, _)| w as f32).sum::<f32>() / sizes.len() as f32
        };

        let id = refs.alloc(RefType::FontDescriptor(font_index));
        let name = self.name().unwrap_or_else(|| format!("F{font_index}"));
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::empty();
        flags.set(FontFlags::FIXED_PITCH, face.is_monospaced());
        flags.set(FontFlags::ITALIC, face.is_italic());
        flags.set(FontFlags::NON_SYMBOLIC, true);
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: face.descender() as f32 * scaling,
            x2: max_width * scaling,
            y2: max_height * scaling,
        });
        descriptor.italic_angle(
            face.tables()
                .post
                .as_ref()
                .map(|post| post.italic_angle)
                .unwrap_or_default(),
        );
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        let cap_height = face.capital_height().map(|h| h as f32 * scaling);
        descriptor.cap_height(cap_height.unwrap_or(1000.0));
        descriptor.x_height(
            face.x_height()
                .map(|h| h as f32 * scaling)
                .or(cap_height)
                .unwrap_or_default(),
        );
        // TODO: read the dominant stem width from the font's hinting tables
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width * scaling);
        descriptor.missing_width(max_width * scaling);
        descriptor.font_file2(data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &HashMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.alloc(RefType::ToUnicode(font_index));

        let mut map = String::from(concat!(
            "/CIDInit /ProcSet findresource begin\n",
            "12 dict begin\n",
            "begincmap\n",
            "/CIDSystemInfo\n",
            "<< /Registry (Adobe)\n",
            "/Ordering (UCS) /Supplement 0 >> def\n",
            "/CMapName /Adobe-Identity-UCS def\n",
            "/CMapType 2 def\n",
            "1 begincodespacerange\n",
            "<0000> <FFFF>\n",
            "endcodespacerange\n",
        ));

        let mut glyphs: Vec<(u16, char)> = glyphs.iter().map(|(&gid, &ch)| (gid, ch)).collect();
        glyphs.sort_by_key(|&(gid, _)| gid);

        // bfchar blocks hold at most 100 entries sharing the same high byte
        for block in glyphs.chunk_by(|a, b| a.0 >> 8 == b.0 >> 8) {
            for chunk in block.chunks(100) {
                map.push_str(&format!("{} beginbfchar\n", chunk.len()));
                for &(gid, ch) in chunk {
                    map.push_str(&format!("<{gid:04x}> <{:04x}>\n", u32::from(ch)));
                }
                map.push_str("endbfchar\n");
            }
        }
        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }
}

impl TextMetrics for Font {
    fn advance(&self, ch: char, size: Pt) -> Pt {
        let face = self.face();
        let glyph = face
            .glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'));
        let advance = glyph
            .and_then(|glyph| face.glyph_hor_advance(glyph))
            .unwrap_or_default();
        Pt(advance as f32 * self.scaling(size))
    }

    fn ascent(&self, size: Pt) -> Pt {
        Pt(self.face().ascender() as f32 * self.scaling(size))
    }

    fn descent(&self, size: Pt) -> Pt {
        Pt(self.face().descender() as f32 * self.scaling(size))
    }

    fn leading(&self, size: Pt) -> Pt {
        Pt(self.face().line_gap() as f32 * self.scaling(size))
    }
}
