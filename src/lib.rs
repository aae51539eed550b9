// emtype/src/lib.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small font loading library.
//!
//! emtype decodes glyph geometry from a font byte stream on demand. The
//! caller hands a [`Reader`] over a font file to [`Font::new`] and requests
//! glyphs by Unicode code point; the library returns a normalized outline
//! (contours of on/off-curve points in the font's em-square coordinate
//! system) together with layout metrics.
//!
//! Format support is pluggable: each format registers a loader that is
//! probed in order until one claims the stream. Currently only TrueType
//! outlines (`glyf`/`loca`) are implemented.
//!
//! Decoded glyphs are cached for the lifetime of the font, so repeated
//! lookups of the same code point never touch the byte stream twice.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

pub mod error;
pub mod font;
pub mod glyph;
pub mod reader;
pub mod truetype;

mod loader;

#[cfg(test)]
mod tests;

pub use crate::error::FontError;
pub use crate::font::{Font, FontMetrics};
pub use crate::glyph::{Glyph, Point};
pub use crate::reader::Reader;
