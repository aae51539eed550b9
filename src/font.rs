// emtype/src/font.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The font facade: format dispatch and the glyph cache.

use std::path::Path;

use crate::error::FontError;
use crate::glyph::Glyph;
use crate::loader::{Loader, LOADERS};
use crate::reader::Reader;

/// Metrics that apply to the entire font, in em-units.
///
/// The bounding box is the union of all glyph bounding boxes as declared by
/// the font header. The baseline-to-baseline height is
/// `ascender - descender + line_gap`.
#[derive(Clone, Copy, Default, Debug)]
pub struct FontMetrics {
    pub xmin: i16,
    pub ymin: i16,
    pub xmax: i16,
    pub ymax: i16,
    /// Distance from the baseline to the top of the text box. Positive.
    pub ascender: i16,
    /// Distance from the baseline to the bottom of the text box. Typically
    /// negative.
    pub descender: i16,
    /// Recommended extra gap between lines.
    pub line_gap: i16,
}

/// A handle to a font backed by a byte stream.
///
/// Glyphs are decoded lazily on first request and cached for the lifetime of
/// the font; there is no eviction. The cache is kept sorted by code point,
/// so a repeated lookup is a binary search and nothing more.
pub struct Font<'a> {
    reader: Reader<'a>,
    loader: Box<dyn Loader>,
    loader_name: &'static str,
    metrics: FontMetrics,
    dpi: u32,
    missing: Glyph,
    pub(crate) glyphs: Vec<Glyph>,
}

impl<'a> Font<'a> {
    /// Creates a font from a reader over the contents of a font file.
    ///
    /// Every registered format is probed in order and the first one that
    /// claims the stream decodes it. Returns
    /// [`FontError::UnknownFormat`] if no loader does.
    pub fn new(mut reader: Reader<'a>, dpi: u32) -> Result<Font<'a>, FontError> {
        let mut selected = None;
        for registration in &LOADERS {
            reader.jump(0);
            if (registration.is_valid)(&mut reader) {
                selected = Some(registration);
                break;
            }
        }

        let registration = match selected {
            Some(registration) => registration,
            None => return Err(FontError::UnknownFormat),
        };
        debug!("stream claimed by the {} loader", registration.name);

        let mut loader = (registration.create)();
        let mut metrics = FontMetrics::default();

        reader.jump(0);
        loader.init(&mut reader, &mut metrics)?;
        let missing = loader.load_missing(&mut reader)?;

        Ok(Font {
            reader,
            loader,
            loader_name: registration.name,
            metrics,
            dpi,
            missing,
            glyphs: vec![],
        })
    }

    /// Opens the font file at `path`.
    pub fn from_file<P>(path: P, dpi: u32) -> Result<Font<'static>, FontError>
    where
        P: AsRef<Path>,
    {
        Font::new(Reader::open(path)?, dpi)
    }

    /// Returns the glyph for the given code point.
    ///
    /// On the first request the glyph is decoded from the stream and cached;
    /// later requests return the cached copy. A code point that cannot be
    /// decoded (unmappable, or mapped to malformed data) yields the font's
    /// missing glyph, so this never fails.
    pub fn glyph(&mut self, codepoint: u32) -> &Glyph {
        let insert_pos = match self.search_glyph(codepoint) {
            Ok(index) => return &self.glyphs[index],
            Err(insert_pos) => insert_pos,
        };

        let glyph_id = self.loader.glyph_id_for_codepoint(&mut self.reader, codepoint);
        debug!(
            "cache miss for U+{:04X}: decoding glyph {} at cache slot {}",
            codepoint, glyph_id, insert_pos
        );

        match self.loader.load_glyph(&mut self.reader, glyph_id) {
            Ok(mut glyph) => {
                glyph.codepoint = codepoint;
                self.glyphs.insert(insert_pos, glyph);
                &self.glyphs[insert_pos]
            }
            Err(err) => {
                debug!("glyph {} failed to decode: {}", glyph_id, err);
                &self.missing
            }
        }
    }

    /// Searches the cache for a code point.
    ///
    /// Returns the cache index on a hit, or the position a glyph for this
    /// code point must be inserted at to keep the cache sorted.
    pub(crate) fn search_glyph(&self, codepoint: u32) -> Result<usize, usize> {
        if self.glyphs.is_empty() {
            return Err(0);
        }

        let last = self.glyphs.len() - 1;
        if codepoint == self.glyphs[0].codepoint {
            return Ok(0);
        }
        if codepoint == self.glyphs[last].codepoint {
            return Ok(last);
        }
        if codepoint < self.glyphs[0].codepoint {
            return Err(0);
        }
        if codepoint > self.glyphs[last].codepoint {
            return Err(last + 1);
        }

        let (mut first, mut last) = (0, last);
        while first != last {
            let selected = (first + last) / 2;
            if self.glyphs[selected].codepoint == codepoint {
                return Ok(selected);
            }
            if self.glyphs[selected].codepoint < codepoint {
                first = selected + 1
            } else {
                last = selected
            }
        }

        if self.glyphs[first].codepoint == codepoint {
            Ok(first)
        } else {
            Err(first)
        }
    }

    /// Converts a length in em-units to device pixels at the given point
    /// size and this font's resolution.
    #[inline]
    pub fn size_to_pixels(&self, point_size: i32, em_units: i32) -> i32 {
        self.loader.size_to_pixels(self.dpi, point_size, em_units)
    }

    /// Returns the fallback glyph used for code points that fail to decode.
    #[inline]
    pub fn missing_glyph(&self) -> &Glyph {
        &self.missing
    }

    /// Returns the font-wide metrics.
    #[inline]
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// The resolution this font converts sizes at, in dots per inch.
    #[inline]
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// The name of the format loader that claimed this font.
    #[inline]
    pub fn format(&self) -> &'static str {
        self.loader_name
    }

    /// The number of glyphs decoded so far.
    #[inline]
    pub fn cached_glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
