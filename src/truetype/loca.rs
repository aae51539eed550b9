// emtype/src/truetype/loca.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::reader::Reader;

/// Looks up a glyph's offset into `glyf`.
///
/// Short-format entries store the offset halved, long-format entries store
/// it directly.
pub fn location_of(
    reader: &mut Reader,
    loca_pos: usize,
    long_offsets: bool,
    glyph_id: u32,
) -> u32 {
    if long_offsets {
        reader.jump(loca_pos + glyph_id as usize * 4);
        reader.read_u32()
    } else {
        reader.jump(loca_pos + glyph_id as usize * 2);
        reader.read_u16() as u32 * 2
    }
}
