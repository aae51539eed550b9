// emtype/src/loader.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The capability set every format loader must satisfy.

use crate::error::FontError;
use crate::font::FontMetrics;
use crate::glyph::Glyph;
use crate::reader::Reader;
use crate::truetype::TrueTypeLoader;

/// A font format backend.
///
/// A loader owns whatever format-private state it needs (table offsets,
/// scratch buffers) and performs all parsing through the font's shared
/// reader. Loaders are probed via the registry in [`LOADERS`]; once one
/// claims a stream, every further operation on the font goes through it.
pub trait Loader {
    /// Parses the font-wide tables, filling the loader's private state and
    /// the font's global metrics.
    ///
    /// A loader whose probe claimed the stream must not fail here for
    /// well-formed input.
    fn init(&mut self, reader: &mut Reader, metrics: &mut FontMetrics) -> Result<(), FontError>;

    /// Decodes the fallback glyph returned for unmappable code points.
    fn load_missing(&mut self, reader: &mut Reader) -> Result<Glyph, FontError>;

    /// Resolves a code point to a glyph id. By sfnt convention id 0 is the
    /// missing glyph.
    fn glyph_id_for_codepoint(&mut self, reader: &mut Reader, codepoint: u32) -> u32;

    /// Decodes the glyph with the given id.
    fn load_glyph(&mut self, reader: &mut Reader, glyph_id: u32) -> Result<Glyph, FontError>;

    /// Converts a length in em-units to device pixels at the given point
    /// size and resolution.
    fn size_to_pixels(&self, dpi: u32, point_size: i32, em_units: i32) -> i32;
}

/// A registry entry for one font format.
///
/// Probing happens before any loader state exists, so `is_valid` is a plain
/// function over the reader; `create` builds the private state once the
/// format has claimed the stream.
pub struct LoaderRegistration {
    pub name: &'static str,
    /// Probes the stream. May leave the cursor anywhere; must not claim a
    /// stream `init` would reject.
    pub is_valid: fn(&mut Reader) -> bool,
    pub create: fn() -> Box<dyn Loader>,
}

/// Registered format loaders, in probe order. The first claim wins.
pub static LOADERS: [LoaderRegistration; 1] = [LoaderRegistration {
    name: "truetype",
    is_valid: TrueTypeLoader::is_valid,
    create: TrueTypeLoader::create,
}];
