// emtype/src/truetype/glyf.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Simple and compound glyph decoding.

use crate::error::FontError;
use crate::glyph::{Glyph, Point};
use crate::reader::Reader;
use crate::truetype::{hmtx, loca, TrueTypeLoader};

bitflags! {
    struct PointFlags: u8 {
        const ON_CURVE = 1 << 0;
        const X_SHORT_VECTOR = 1 << 1;
        const Y_SHORT_VECTOR = 1 << 2;
        const REPEAT = 1 << 3;
        const THIS_X_IS_SAME = 1 << 4;
        const THIS_Y_IS_SAME = 1 << 5;
    }
}

bitflags! {
    struct ComponentFlags: u16 {
        const ARG_1_AND_2_ARE_WORDS = 1 << 0;
        const ARGS_ARE_XY_VALUES = 1 << 1;
        const WE_HAVE_A_SCALE = 1 << 3;
        const MORE_COMPONENTS = 1 << 5;
        const WE_HAVE_AN_X_AND_Y_SCALE = 1 << 6;
        const WE_HAVE_A_TWO_BY_TWO = 1 << 7;
        const USE_MY_METRICS = 1 << 9;
    }
}

/// Bit 15 of the contour count marks a compound glyph.
const COMPOUND_GLYPH: u16 = 1 << 15;

impl TrueTypeLoader {
    /// Positions the cursor on a glyph's description via `loca` and reads
    /// the header, returning the raw contour-count word (bit 15 set for a
    /// compound glyph).
    ///
    /// The bounding box is read into `glyph` only when `load_sizes` is set,
    /// so a component glyph cannot overwrite the compound's box. Metrics are
    /// fetched from `hmtx` (cursor saved and restored around the excursion)
    /// when `load_metrics` is set.
    pub(super) fn load_glyph_header(
        &mut self,
        reader: &mut Reader,
        glyph: &mut Glyph,
        glyph_id: u32,
        load_sizes: bool,
        load_metrics: bool,
    ) -> u16 {
        let offset = loca::location_of(reader, self.loca_pos, self.long_loca_offsets, glyph_id);
        reader.jump(self.glyf_pos + offset as usize);

        let contour_count = reader.read_u16();
        if load_sizes {
            glyph.xmin = reader.read_i16();
            glyph.ymin = reader.read_i16();
            glyph.xmax = reader.read_i16();
            glyph.ymax = reader.read_i16();
        } else {
            reader.skip(4 * 2);
        }

        if load_metrics {
            let metrics =
                hmtx::metrics_for_glyph(reader, self.hmtx_pos, self.number_of_h_metrics, glyph_id);
            glyph.advance_width = metrics.advance_width;
            glyph.left_side_bearing = metrics.left_side_bearing;
        }

        contour_count
    }

    /// Decodes a simple glyph description at the cursor, appending
    /// `added_contours` contours to `glyph`.
    ///
    /// Appending (rather than replacing) is what makes compound assembly
    /// work: each component decodes into the same glyph, and the new contour
    /// end indices are rebased onto the points already present.
    pub(super) fn load_simple_glyph(
        &mut self,
        reader: &mut Reader,
        glyph: &mut Glyph,
        added_contours: u16,
    ) -> Result<(), FontError> {
        let added = added_contours as usize;
        if added == 0 {
            return Ok(());
        }

        let contour_start = glyph.contour_ends.len();
        let previous_point_count = glyph.points.len();

        glyph
            .contour_ends
            .try_reserve(added)
            .map_err(|_| FontError::OutOfMemory)?;
        for _ in 0..added {
            glyph.contour_ends.push(reader.read_u16() as u32)
        }

        // Hinting instructions are not interpreted.
        let instruction_count = reader.read_u16();
        reader.skip(instruction_count as usize);

        let point_count = glyph.contour_ends[contour_start + added - 1] as usize + 1;
        trace!("decoding {} points in {} contours", point_count, added);
        if point_count > self.max_points as usize {
            return Err(FontError::Corrupted);
        }

        // Expand the run-length-encoded flags into the scratch buffer.
        let mut i = 0;
        while i < point_count {
            let flag = reader.read_u8();
            self.flags[i] = flag;
            i += 1;

            if PointFlags::from_bits_truncate(flag).contains(PointFlags::REPEAT) {
                let count = reader.read_u8();
                for _ in 0..count {
                    if i >= point_count {
                        debug!("flag repeat runs past the declared point count");
                        break;
                    }
                    self.flags[i] = flag;
                    i += 1;
                }
            }
        }

        glyph
            .points
            .try_reserve(point_count)
            .map_err(|_| FontError::OutOfMemory)?;

        // Coordinates are stored as two delta streams, all X then all Y,
        // accumulating from (0, 0). A short (one-byte) delta carries its
        // sign in the SAME flag; a missing delta repeats the previous
        // coordinate.
        let mut x = 0;
        for i in 0..point_count {
            let flags = PointFlags::from_bits_truncate(self.flags[i]);
            if flags.contains(PointFlags::X_SHORT_VECTOR) {
                let mut value = reader.read_u8() as i32;
                if !flags.contains(PointFlags::THIS_X_IS_SAME) {
                    value = -value
                }
                x += value;
            } else if !flags.contains(PointFlags::THIS_X_IS_SAME) {
                x += reader.read_i16() as i32;
            }

            glyph.points.push(Point {
                x,
                y: 0,
                on_curve: flags.contains(PointFlags::ON_CURVE),
            })
        }

        let mut y = 0;
        for i in 0..point_count {
            let flags = PointFlags::from_bits_truncate(self.flags[i]);
            if flags.contains(PointFlags::Y_SHORT_VECTOR) {
                let mut value = reader.read_u8() as i32;
                if !flags.contains(PointFlags::THIS_Y_IS_SAME) {
                    value = -value
                }
                y += value;
            } else if !flags.contains(PointFlags::THIS_Y_IS_SAME) {
                y += reader.read_i16() as i32;
            }

            glyph.points[previous_point_count + i].y = y;
        }

        // The contour ends just read are relative to this description;
        // rebase them onto the points that were already in the glyph.
        for end in &mut glyph.contour_ends[contour_start..] {
            *end += previous_point_count as u32
        }

        Ok(())
    }

    /// Decodes a compound glyph description at the cursor by flattening each
    /// referenced component into `glyph`.
    ///
    /// A component that is itself compound ends the assembly with whatever
    /// has been decoded so far, which also bounds the recursion on fonts
    /// with cyclic references.
    pub(super) fn load_compound_glyph(
        &mut self,
        reader: &mut Reader,
        glyph: &mut Glyph,
    ) -> Result<(), FontError> {
        loop {
            let flags = ComponentFlags::from_bits_truncate(reader.read_u16());
            let component_id = reader.read_u16() as u32;

            let args_are_offsets = flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES);
            let words = flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS);

            let (mut dx, mut dy) = (0i32, 0i32);
            let (mut num1, mut num2) = (0usize, 0usize);
            if args_are_offsets {
                if words {
                    dx = reader.read_i16() as i32;
                    dy = reader.read_i16() as i32;
                } else {
                    dx = reader.read_u8() as i8 as i32;
                    dy = reader.read_u8() as i8 as i32;
                }
            } else if words {
                num1 = reader.read_u16() as usize;
                num2 = reader.read_u16() as usize;
            } else {
                num1 = reader.read_u8() as usize;
                num2 = reader.read_u8() as usize;
            }
            debug!(
                "component glyph {}: {} as {}",
                component_id,
                if args_are_offsets {
                    "offsets"
                } else {
                    "point numbers"
                },
                if words { "words" } else { "bytes" }
            );

            let saved_pos = reader.pos();
            let old_point_count = glyph.points.len();

            let contour_count = self.load_glyph_header(
                reader,
                glyph,
                component_id,
                false,
                flags.contains(ComponentFlags::USE_MY_METRICS),
            );
            if contour_count & COMPOUND_GLYPH != 0 {
                // Nested compound glyph: stop with what has been assembled.
                return Ok(());
            }
            self.load_simple_glyph(reader, glyph, contour_count)
                .map_err(|_| FontError::Corrupted)?;

            let point_count = glyph.points.len();
            reader.jump(saved_pos);

            if !args_are_offsets {
                // Align a point of the freshly appended component onto a
                // point decoded earlier. Out-of-range numbers leave the
                // component where it is.
                dx = 0;
                dy = 0;
                let anchor = num1;
                let aligned = num2 + old_point_count;
                if anchor < point_count && aligned < point_count {
                    dx = glyph.points[anchor].x - glyph.points[aligned].x;
                    dy = glyph.points[anchor].y - glyph.points[aligned].y;
                }
            }

            for point in &mut glyph.points[old_point_count..] {
                point.x += dx;
                point.y += dy;
            }

            // Scale and 2x2 transform fields are parsed past but not applied
            // to the component's points.
            if flags.contains(ComponentFlags::WE_HAVE_A_SCALE) {
                reader.skip(2);
            } else if flags.contains(ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
                reader.skip(2 * 2);
            } else if flags.contains(ComponentFlags::WE_HAVE_A_TWO_BY_TWO) {
                reader.skip(4 * 2);
            }

            if !flags.contains(ComponentFlags::MORE_COMPONENTS) {
                break;
            }
        }

        Ok(())
    }
}
