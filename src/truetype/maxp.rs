// emtype/src/truetype/maxp.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::FontError;
use crate::reader::Reader;

const VERSION_1_0: u32 = 0x0001_0000;

/// The maximum-profile table: how much a glyph of this font can hold.
#[derive(Clone, Copy, Debug)]
pub struct MaxpTable {
    pub num_glyphs: u16,
    /// Upper bound on the point count of any simple glyph, used to size the
    /// decoder's flag scratch buffer. A glyph claiming more points than this
    /// is corrupt by the font's own declaration.
    pub max_points: u16,
}

impl MaxpTable {
    pub fn parse(reader: &mut Reader, offset: usize) -> Result<MaxpTable, FontError> {
        reader.jump(offset);

        if reader.read_u32() != VERSION_1_0 {
            return Err(FontError::Corrupted);
        }

        let num_glyphs = reader.read_u16();
        let max_points = reader.read_u16();

        Ok(MaxpTable {
            num_glyphs,
            max_points,
        })
    }
}
