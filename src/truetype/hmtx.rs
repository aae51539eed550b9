// emtype/src/truetype/hmtx.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::reader::Reader;

/// Horizontal metrics of one glyph, straight out of `hmtx`.
#[derive(Clone, Copy, Default, Debug)]
pub struct HorizontalMetrics {
    pub advance_width: u16,
    pub left_side_bearing: i16,
}

/// Reads the horizontal metrics for a glyph.
///
/// `hmtx` holds `number_of_h_metrics` full (advance, bearing) pairs; glyph
/// ids past that reuse the advance of the last pair and index the trailing
/// bearing-only array. The cursor is restored before returning, since this
/// is called in the middle of decoding a glyph header.
pub fn metrics_for_glyph(
    reader: &mut Reader,
    hmtx_pos: usize,
    number_of_h_metrics: u16,
    glyph_id: u32,
) -> HorizontalMetrics {
    let saved_pos = reader.pos();
    let full_entries = number_of_h_metrics as usize;

    let advance_width;
    if (glyph_id as usize) < full_entries {
        reader.jump(hmtx_pos + 4 * glyph_id as usize);
        advance_width = reader.read_u16();
    } else {
        reader.jump(hmtx_pos + 4 * (full_entries - 1));
        advance_width = reader.read_u16();
        reader.jump(hmtx_pos + 4 * full_entries + (glyph_id as usize - full_entries) * 2);
    }
    let left_side_bearing = reader.read_i16();

    reader.jump(saved_pos);

    HorizontalMetrics {
        advance_width,
        left_side_bearing,
    }
}
