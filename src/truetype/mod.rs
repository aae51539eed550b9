// emtype/src/truetype/mod.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The TrueType (`glyf` outline) loader.

use crate::error::FontError;
use crate::font::FontMetrics;
use crate::glyph::Glyph;
use crate::loader::Loader;
use crate::reader::Reader;
use crate::truetype::cmap::CharMap;

mod cmap;
mod glyf;
mod head;
mod hhea;
mod hmtx;
mod loca;
mod maxp;

/// Tables that must be present for a stream to be claimed as TrueType.
/// `name` and `post` are never decoded, but a font missing them is broken
/// enough to reject.
const REQUIRED_TABLES: [[u8; 4]; 9] = [
    *b"cmap", *b"glyf", *b"head", *b"hhea", *b"hmtx", *b"loca", *b"maxp", *b"name", *b"post",
];

/// One entry of the sfnt table directory.
///
/// The tag is kept as the four raw ASCII bytes from the stream and compared
/// bytewise, so lookups behave the same on any host endianness.
#[derive(Clone, Copy, Debug)]
pub struct TableDirEntry {
    pub tag: [u8; 4],
    pub checksum: u32,
    pub offset: u32,
    pub size: u32,
}

/// Private state of the TrueType loader.
pub struct TrueTypeLoader {
    table_dir: Vec<TableDirEntry>,

    num_glyphs: u16,
    max_points: u16,
    units_per_em: u16,
    long_loca_offsets: bool,
    number_of_h_metrics: u16,

    char_map: Option<CharMap>,

    glyf_pos: usize,
    loca_pos: usize,
    cmap_pos: usize,
    hmtx_pos: usize,

    // Scratch buffer for one glyph's point flags, sized from `maxp` at init
    // so glyph decoding never allocates for flags.
    flags: Vec<u8>,
}

impl TrueTypeLoader {
    fn new() -> TrueTypeLoader {
        TrueTypeLoader {
            table_dir: vec![],
            num_glyphs: 0,
            max_points: 0,
            units_per_em: 0,
            long_loca_offsets: false,
            number_of_h_metrics: 0,
            char_map: None,
            glyf_pos: 0,
            loca_pos: 0,
            cmap_pos: 0,
            hmtx_pos: 0,
            flags: vec![],
        }
    }

    /// Probes the stream for the registry: walks the table directory without
    /// recording it and claims the stream iff every required table is there.
    pub(crate) fn is_valid(reader: &mut Reader) -> bool {
        walk_directory(reader, None).is_ok()
    }

    pub(crate) fn create() -> Box<dyn Loader> {
        Box::new(TrueTypeLoader::new())
    }

    fn table_offset(&self, tag: &[u8; 4]) -> Result<usize, FontError> {
        self.table_dir
            .iter()
            .find(|entry| entry.tag == *tag)
            .map(|entry| entry.offset as usize)
            .ok_or(FontError::Corrupted)
    }
}

impl Loader for TrueTypeLoader {
    fn init(&mut self, reader: &mut Reader, metrics: &mut FontMetrics) -> Result<(), FontError> {
        walk_directory(reader, Some(&mut self.table_dir))?;

        self.glyf_pos = self.table_offset(b"glyf")?;
        self.loca_pos = self.table_offset(b"loca")?;
        self.cmap_pos = self.table_offset(b"cmap")?;
        self.hmtx_pos = self.table_offset(b"hmtx")?;

        let maxp = maxp::MaxpTable::parse(reader, self.table_offset(b"maxp")?)?;
        self.num_glyphs = maxp.num_glyphs;
        self.max_points = maxp.max_points;
        debug!("font has {} glyphs", self.num_glyphs);

        let head = head::HeadTable::parse(reader, self.table_offset(b"head")?)?;
        self.units_per_em = head.units_per_em;
        self.long_loca_offsets = head.long_loca_offsets;
        metrics.xmin = head.xmin;
        metrics.ymin = head.ymin;
        metrics.xmax = head.xmax;
        metrics.ymax = head.ymax;

        self.char_map = CharMap::select(reader, self.cmap_pos);
        if self.char_map.is_none() {
            warn!("no supported cmap subtable; code points will be used as glyph ids");
        }

        let hhea = hhea::HheaTable::parse(reader, self.table_offset(b"hhea")?)?;
        self.number_of_h_metrics = hhea.number_of_h_metrics;
        metrics.ascender = hhea.ascender;
        metrics.descender = hhea.descender;
        metrics.line_gap = hhea.line_gap;

        self.flags = vec![0; self.max_points as usize];

        Ok(())
    }

    fn load_missing(&mut self, reader: &mut Reader) -> Result<Glyph, FontError> {
        self.load_glyph(reader, 0)
    }

    fn glyph_id_for_codepoint(&mut self, reader: &mut Reader, codepoint: u32) -> u32 {
        match self.char_map {
            Some(ref map) => map.glyph_id_for_codepoint(reader, codepoint),
            // No usable character map: hand the code point through and let
            // the glyph loader decide.
            None => codepoint,
        }
    }

    fn load_glyph(&mut self, reader: &mut Reader, glyph_id: u32) -> Result<Glyph, FontError> {
        let mut glyph = Glyph::new();
        let contour_count = self.load_glyph_header(reader, &mut glyph, glyph_id, true, true);
        if contour_count & 0x8000 == 0 {
            self.load_simple_glyph(reader, &mut glyph, contour_count)?;
        } else {
            self.load_compound_glyph(reader, &mut glyph)?;
        }
        Ok(glyph)
    }

    fn size_to_pixels(&self, dpi: u32, point_size: i32, em_units: i32) -> i32 {
        em_units * (point_size * dpi as i32) / (72 * self.units_per_em as i32)
    }
}

/// Walks the table directory from the top of the stream.
///
/// With `dir` absent this is the probe: only the set of required tags is
/// checked. With `dir` present every entry is recorded for later lookups.
/// Either way, a missing required table is `Corrupted`.
fn walk_directory(
    reader: &mut Reader,
    dir: Option<&mut Vec<TableDirEntry>>,
) -> Result<(), FontError> {
    // Offset subtable: scaler type, table count, then the binary-search
    // helpers (search range, entry selector, range shift) we have no use
    // for.
    reader.skip(4);
    let table_count = reader.read_u16();
    reader.skip(6);

    let mut entries = match dir {
        Some(entries) => {
            entries.clear();
            entries
                .try_reserve_exact(table_count as usize)
                .map_err(|_| FontError::OutOfMemory)?;
            Some(entries)
        }
        None => None,
    };

    // TODO: Verify the per-table checksums described in the sfnt spec.
    let mut found = [false; REQUIRED_TABLES.len()];
    for _ in 0..table_count {
        let mut tag = [0; 4];
        reader.read_bytes(&mut tag);
        let checksum = reader.read_u32();
        let offset = reader.read_u32();
        let size = reader.read_u32();

        if let Some(index) = REQUIRED_TABLES.iter().position(|required| *required == tag) {
            found[index] = true
        }

        if let Some(ref mut entries) = entries {
            debug!(
                "table {} at offset {:#010x}",
                String::from_utf8_lossy(&tag),
                offset
            );
            entries.push(TableDirEntry {
                tag,
                checksum,
                offset,
                size,
            })
        }
    }

    if found.iter().all(|&present| present) {
        Ok(())
    } else {
        Err(FontError::Corrupted)
    }
}
