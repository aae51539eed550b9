// emtype/src/truetype/cmap.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character-to-glyph-id mapping.

use crate::reader::Reader;

const PLATFORM_ID_UNICODE: u16 = 0;
const PLATFORM_ID_MICROSOFT: u16 = 3;

const UNICODE_ENCODING_ID_2_0_BMP: u16 = 3;
const UNICODE_ENCODING_ID_2_0_FULL: u16 = 4;

const FORMAT_SEGMENT_MAPPING_TO_DELTA_VALUES: u16 = 4;
const FORMAT_SEGMENTED_COVERAGE: u16 = 12;

/// The character map subtable chosen at init time.
///
/// `data_offset` points into the stream just past the subtable's header
/// (at `segCountX2` for format 4, at the first group for format 12), so a
/// lookup can replay the subtable through the font's shared cursor without
/// re-deriving anything.
#[derive(Clone, Copy, Debug)]
pub struct CharMap {
    pub format: u16,
    pub platform_id: u16,
    /// Number of groups of a format 12 subtable; unused for format 4.
    pub group_count: u32,
    pub data_offset: usize,
}

impl CharMap {
    /// Enumerates the encoding subtables of the `cmap` table at `cmap_pos`
    /// and picks the one lookups will use.
    ///
    /// Unicode-platform subtables in formats 4 and 12 are eligible. The last
    /// eligible subtable encountered wins, except that a format 12 map (full
    /// Unicode coverage) is never displaced by a format 4 one.
    pub fn select(reader: &mut Reader, cmap_pos: usize) -> Option<CharMap> {
        // version, then the subtable count.
        reader.jump(cmap_pos);
        reader.skip(2);
        let subtable_count = reader.read_u16();

        let mut selected: Option<CharMap> = None;

        for i in 0..subtable_count as usize {
            reader.jump(cmap_pos + 4 + i * 8);

            let platform_id = reader.read_u16();
            let specific_id = reader.read_u16();
            debug!(
                "cmap subtable {}: platform {}, encoding {}",
                i, platform_id, specific_id
            );

            if platform_id == PLATFORM_ID_UNICODE {
                let subtable_offset = reader.read_u32() as usize;
                reader.jump(cmap_pos + subtable_offset);

                if specific_id != UNICODE_ENCODING_ID_2_0_BMP
                    && specific_id != UNICODE_ENCODING_ID_2_0_FULL
                {
                    continue;
                }

                let format = reader.read_u16();
                match format {
                    FORMAT_SEGMENT_MAPPING_TO_DELTA_VALUES => {
                        let _length = reader.read_u16();
                        // language code.
                        reader.skip(2);

                        let have_full_coverage = selected
                            .as_ref()
                            .map_or(false, |map| map.format == FORMAT_SEGMENTED_COVERAGE);
                        if !have_full_coverage {
                            debug!("selecting format 4 subtable {}", i);
                            selected = Some(CharMap {
                                format,
                                platform_id,
                                group_count: 0,
                                data_offset: reader.pos(),
                            })
                        }
                    }
                    FORMAT_SEGMENTED_COVERAGE => {
                        // reserved.
                        reader.skip(2);
                        let _length = reader.read_u32();
                        // language code.
                        reader.skip(4);
                        let group_count = reader.read_u32();

                        debug!("selecting format 12 subtable {} ({} groups)", i, group_count);
                        selected = Some(CharMap {
                            format,
                            platform_id,
                            group_count,
                            data_offset: reader.pos(),
                        })
                    }
                    _ => debug!("unsupported cmap format {}", format),
                }
            } else if platform_id == PLATFORM_ID_MICROSOFT {
                // Microsoft-platform subtables duplicate the Unicode ones in
                // the fonts we care about; not resolved here.
                debug!("skipping platform 3 subtable");
            }
        }

        selected
    }

    /// Resolves a code point through the selected subtable.
    ///
    /// When no segment or group maps the code point, it is returned
    /// unchanged: the caller will try it as a glyph id and the decoder's
    /// structural checks (or the missing-glyph fallback) take it from there.
    pub fn glyph_id_for_codepoint(&self, reader: &mut Reader, codepoint: u32) -> u32 {
        if self.platform_id != PLATFORM_ID_UNICODE {
            return codepoint;
        }

        reader.jump(self.data_offset);
        match self.format {
            FORMAT_SEGMENT_MAPPING_TO_DELTA_VALUES => self.lookup_format_4(reader, codepoint),
            FORMAT_SEGMENTED_COVERAGE => self.lookup_format_12(reader, codepoint),
            _ => codepoint,
        }
    }

    /// Format 4: segmented mapping of the BMP, four parallel arrays indexed
    /// by segment. The cursor sits at `segCountX2`.
    fn lookup_format_4(&self, reader: &mut Reader, codepoint: u32) -> u32 {
        let seg_count = (reader.read_u16() / 2) as usize;
        // searchRange, entrySelector, rangeShift.
        reader.skip(3 * 2);

        // End codes are sorted; walk them until one covers the code point.
        for _ in 0..seg_count {
            let end_char = reader.read_u16() as u32;
            let saved_pos = reader.pos();

            if end_char < codepoint {
                continue;
            }

            // Over the remaining end codes and the reserved pad, onto this
            // segment's start code.
            reader.skip(seg_count * 2);
            let start_char = reader.read_u16() as u32;
            if start_char > codepoint {
                // The hole before this segment; resume the end-code walk.
                reader.jump(saved_pos);
                continue;
            }

            reader.skip(seg_count * 2 - 2);
            let delta = reader.read_u16() as u32;
            reader.skip(seg_count * 2 - 2);
            let range_offset = reader.read_u16() as u32;
            debug!(
                "format 4 segment for U+{:04X}: start {:#06x}, end {:#06x}, delta {:#06x}, \
                 range offset {:#06x}",
                codepoint, start_char, end_char, delta, range_offset
            );

            if range_offset == 0 {
                return (delta + codepoint) & 0xffff;
            }

            // The range offset is relative to its own slot in the
            // idRangeOffset array, which the cursor just passed.
            reader.skip((range_offset as usize + 2 * (codepoint - start_char) as usize).wrapping_sub(2));
            return delta + reader.read_u16() as u32;
        }

        codepoint
    }

    /// Format 12: sequential groups of `(start_char, end_char, start_index)`
    /// covering the full Unicode range. The cursor sits at the first group.
    fn lookup_format_12(&self, reader: &mut Reader, codepoint: u32) -> u32 {
        for _ in 0..self.group_count {
            let start_char = reader.read_u32();
            let end_char = reader.read_u32();
            let start_index = reader.read_u32();

            if codepoint >= start_char && codepoint <= end_char {
                return codepoint - start_char + start_index;
            }
        }

        codepoint
    }
}
