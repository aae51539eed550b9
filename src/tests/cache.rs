// emtype/src/tests/cache.rs
//
// Copyright © 2024 The Emtype Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use quickcheck;
use std::collections::BTreeSet;

use crate::font::Font;
use crate::reader::Reader;
use crate::tests::builder::{empty_glyph, simple_glyph, FontBuilder, Segment};

/// A font where every BMP code point resolves to some decodable glyph, so
/// the cache grows on every distinct lookup.
fn cache_font_bytes() -> Vec<u8> {
    let mut builder = FontBuilder::new();
    builder.add_glyph(empty_glyph(), 300, 0);
    builder.add_glyph(
        simple_glyph((0, 0, 10, 10), &[&[(0, 0, true), (10, 0, true), (5, 10, false)]]),
        320,
        2,
    );
    builder.map(Segment::Delta {
        start: 0,
        end: 0xfffe,
        first_glyph: 0,
    });
    builder.build()
}

fn cache_is_strictly_sorted(font: &Font) -> bool {
    font.glyphs
        .windows(2)
        .all(|pair| pair[0].codepoint < pair[1].codepoint)
}

#[test]
fn repeated_lookup_decodes_once() {
    let bytes = cache_font_bytes();
    let mut font = Font::new(Reader::new(&bytes), 96).unwrap();

    let first = font.glyph(1).clone();
    assert_eq!(font.cached_glyph_count(), 1);

    let second = font.glyph(1).clone();
    assert_eq!(font.cached_glyph_count(), 1);
    assert_eq!(first, second);

    // With no intervening insertions, the cached slot is stable.
    let first_slot = font.glyph(1) as *const _;
    let second_slot = font.glyph(1) as *const _;
    assert_eq!(first_slot, second_slot);
}

#[test]
fn insertion_points_keep_the_cache_sorted() {
    let bytes = cache_font_bytes();
    let mut font = Font::new(Reader::new(&bytes), 96).unwrap();

    for &codepoint in &[90, 10, 50, 10, 30, 90, 70, 20, 0, 100] {
        font.glyph(codepoint);
        assert!(cache_is_strictly_sorted(&font));
    }
    assert_eq!(font.cached_glyph_count(), 8);
}

#[test]
fn search_reports_hits_and_insertion_points() {
    let bytes = cache_font_bytes();
    let mut font = Font::new(Reader::new(&bytes), 96).unwrap();

    assert_eq!(font.search_glyph(42), Err(0));

    font.glyph(20);
    font.glyph(40);
    font.glyph(60);

    assert_eq!(font.search_glyph(20), Ok(0));
    assert_eq!(font.search_glyph(40), Ok(1));
    assert_eq!(font.search_glyph(60), Ok(2));

    assert_eq!(font.search_glyph(10), Err(0));
    assert_eq!(font.search_glyph(30), Err(1));
    assert_eq!(font.search_glyph(50), Err(2));
    assert_eq!(font.search_glyph(70), Err(3));
}

#[test]
fn mixed_lookup_storm_stays_sorted() {
    let bytes = cache_font_bytes();
    let mut font = Font::new(Reader::new(&bytes), 96).unwrap();

    let mut distinct = BTreeSet::new();
    for i in 0..10_000u32 {
        let codepoint = (i * 37) % 199;
        distinct.insert(codepoint);
        font.glyph(codepoint);
    }

    assert!(cache_is_strictly_sorted(&font));
    assert_eq!(font.cached_glyph_count(), distinct.len());
}

#[test]
fn lookups_never_disorder_the_cache() {
    quickcheck::quickcheck(prop_cache_sorted as fn(Vec<u16>) -> bool);

    fn prop_cache_sorted(codepoints: Vec<u16>) -> bool {
        let bytes = cache_font_bytes();
        let mut font = Font::new(Reader::new(&bytes), 96).unwrap();

        let mut distinct = BTreeSet::new();
        for &codepoint in &codepoints {
            distinct.insert(codepoint as u32);
            font.glyph(codepoint as u32);
        }

        cache_is_strictly_sorted(&font) && font.cached_glyph_count() <= distinct.len()
    }
}
