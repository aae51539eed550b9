// emtype/src/truetype/head.rs
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

/// The font header table.
#[derive(Clone, Copy, Debug)]
pub struct HeadTable {
    pub units_per_em: u16,
    /// Bounding box over all glyphs, in em-units.
    pub xmin: i16,
    pub ymin: i16,
    pub xmax: i16,
    pub ymax: i16,
    /// Whether `loca` stores 32-bit offsets (`indexToLocFormat` nonzero).
    pub long_loca_offsets: bool,
}

impl HeadTable {
    pub fn parse(reader: &mut Reader, offset: usize) -> Result<HeadTable, FontError> {
        reader.jump(offset);

        // version, fontRevision, checkSumAdjustment, magicNumber, flags.
        reader.skip(4 * 4 + 2);
        let units_per_em = reader.read_u16();

        // A zero here would make every size conversion divide by zero; it
        // also is what a truncated stream reads as.
        if units_per_em == 0 {
            return Err(FontError::Corrupted);
        }

        // created, modified.
        reader.skip(2 * 8);
        let xmin = reader.read_i16();
        let ymin = reader.read_i16();
        let xmax = reader.read_i16();
        let ymax = reader.read_i16();
        debug!(
            "font bounding box: xmin: {}, ymin: {}, xmax: {}, ymax: {}",
            xmin, ymin, xmax, ymax
        );

        // macStyle, lowestRecPPEM, fontDirectionHint.
        reader.skip(3 * 2);
        let long_loca_offsets = reader.read_i16() != 0;

        Ok(HeadTable {
            units_per_em,
            xmin,
            ymin,
            xmax,
            ymax,
            long_loca_offsets,
        })
    }
}
