use super::*;
use dotmatrix_common::{FrameSink, NullSink};

#[derive(Default)]
struct CountingSink {
    presented: usize,
    last_top_left: Option<Color>,
}

impl FrameSink for CountingSink {
    fn present(&mut self, frame: &FrameBuffer) {
        self.presented += 1;
        self.last_top_left = Some(frame.pixel(0, 0));
    }
}

/// Write a solid tile whose every pixel has color index `index`.
fn fill_tile(video: &mut DisplayController, tile: u16, index: u8) {
    let low = if index & 1 != 0 { 0xFF } else { 0x00 };
    let high = if index & 2 != 0 { 0xFF } else { 0x00 };
    for row in 0..8 {
        video.write_vram(tile * 16 + row * 2, low);
        video.write_vram(tile * 16 + row * 2 + 1, high);
    }
}

#[test]
fn full_frame_returns_to_line_zero_and_presents_once() {
    let mut video = DisplayController::new();
    let mut sink = CountingSink::default();

    let mut presented = false;
    for _ in 0..(FRAME_TICKS / 4) {
        presented |= video.step(4, &mut sink);
    }

    assert!(presented);
    assert_eq!(sink.presented, 1);
    assert_eq!(video.line(), 0);
    assert_eq!(video.mode(), Mode::OamScan);
    assert_eq!(video.frame_count(), 1);
}

#[test]
fn single_large_step_crosses_many_transitions() {
    let mut video = DisplayController::new();
    let mut sink = CountingSink::default();

    assert!(video.step(FRAME_TICKS, &mut sink));
    assert_eq!(sink.presented, 1);
    assert_eq!(video.line(), 0);
    assert_eq!(video.mode(), Mode::OamScan);
}

#[test]
fn overshoot_is_carried_into_next_mode() {
    let mut video = DisplayController::new();
    let mut sink = NullSink;

    video.step(76, &mut sink);
    assert_eq!(video.mode(), Mode::OamScan);

    // 76 + 8 = 84: four ticks already spent in VRAM-scan.
    video.step(8, &mut sink);
    assert_eq!(video.mode(), Mode::VramScan);

    video.step(167, &mut sink);
    assert_eq!(video.mode(), Mode::VramScan);
    video.step(1, &mut sink);
    assert_eq!(video.mode(), Mode::HBlank);
}

#[test]
fn line_timing_through_visible_and_blank_periods() {
    let mut video = DisplayController::new();
    let mut sink = CountingSink::default();

    video.step(456, &mut sink);
    assert_eq!(video.line(), 1);
    assert_eq!(video.mode(), Mode::OamScan);

    video.step(456 * 143 - 1, &mut sink);
    assert_eq!(video.line(), 143);
    assert_eq!(video.mode(), Mode::HBlank);
    assert_eq!(sink.presented, 0);

    video.step(1, &mut sink);
    assert_eq!(video.line(), 144);
    assert_eq!(video.mode(), Mode::VBlank);
    assert_eq!(sink.presented, 1);

    video.step(456 * 9, &mut sink);
    assert_eq!(video.line(), 153);
    assert_eq!(video.mode(), Mode::VBlank);

    video.step(456, &mut sink);
    assert_eq!(video.line(), 0);
    assert_eq!(video.mode(), Mode::OamScan);
    assert_eq!(sink.presented, 1);
}

#[test]
fn two_frames_present_twice() {
    let mut video = DisplayController::new();
    let mut sink = CountingSink::default();
    video.step(FRAME_TICKS * 2, &mut sink);
    assert_eq!(sink.presented, 2);
    assert_eq!(video.frame_count(), 2);
}

#[test]
fn tile_row_write_updates_exactly_one_row() {
    let mut video = DisplayController::new();

    // Tile 1, row 3: low plane 0b1010_0101, high plane 0b1100_0011.
    video.write_vram(0x0010 + 6, 0b1010_0101);
    video.write_vram(0x0010 + 7, 0b1100_0011);

    assert_eq!(video.tiles().row(1, 3), &[3, 2, 1, 0, 0, 1, 2, 3]);

    for tile in 0..TILE_COUNT {
        for row in 0..8 {
            if (tile, row) == (1, 3) {
                continue;
            }
            assert_eq!(video.tiles().row(tile, row), &[0; 8], "tile {tile} row {row}");
        }
    }
}

#[test]
fn odd_byte_write_recomputes_from_pair() {
    let mut video = DisplayController::new();
    video.write_vram(0x0000, 0xFF);
    assert_eq!(video.tiles().row(0, 0), &[1; 8]);

    video.write_vram(0x0001, 0xFF);
    assert_eq!(video.tiles().row(0, 0), &[3; 8]);
}

#[test]
fn tile_map_writes_do_not_touch_cache() {
    let mut video = DisplayController::new();
    let before = video.tiles().clone();

    video.write_vram(0x1800, 0xAB);
    video.write_vram(0x1FFF, 0xCD);

    assert_eq!(video.read_vram(0x1800), 0xAB);
    assert_eq!(video.read_vram(0x1FFF), 0xCD);
    assert!(video.tiles() == &before);
}

#[test]
fn highest_tile_is_cached() {
    let mut video = DisplayController::new();
    video.write_vram(0x17FE, 0x80);
    assert_eq!(video.tiles().pixel(383, 7, 0), 1);
}

#[test]
fn render_uses_palette_for_blank_map() {
    let mut video = DisplayController::new();
    video.render_scan();
    for x in 0..160 {
        assert_eq!(video.frame().pixel(x, 0), Color::WHITE);
    }
}

#[test]
fn render_applies_horizontal_scroll_and_map_wrap() {
    let mut video = DisplayController::new();
    fill_tile(&mut video, 1, 3);

    // Column 1 of map row 0 uses tile 1; everything else tile 0.
    video.write_vram(0x1800 + 1, 1);
    video.set_scroll(4, 0);
    video.render_scan();

    let frame = video.frame();
    for x in 0..4 {
        assert_eq!(frame.pixel(x, 0), Color::WHITE, "x={x}");
    }
    for x in 4..12 {
        assert_eq!(frame.pixel(x, 0), Color::BLACK, "x={x}");
    }
    assert_eq!(frame.pixel(12, 0), Color::WHITE);

    // scx = 248 starts in map column 31 and wraps back to column 0, 1.
    video.set_scroll(248, 0);
    video.render_scan();
    let frame = video.frame();
    assert_eq!(frame.pixel(7, 0), Color::WHITE);
    assert_eq!(frame.pixel(16, 0), Color::BLACK);
    assert_eq!(frame.pixel(23, 0), Color::BLACK);
    assert_eq!(frame.pixel(24, 0), Color::WHITE);
}

#[test]
fn render_applies_vertical_scroll() {
    let mut video = DisplayController::new();
    fill_tile(&mut video, 2, 2);

    // Map row 2, column 0.
    video.write_vram(0x1800 + 2 * 32, 2);
    video.set_scroll(0, 16);
    video.render_scan();

    assert_eq!(video.frame().pixel(0, 0), Color::DARK_GRAY);
    assert_eq!(video.frame().pixel(8, 0), Color::WHITE);
}

#[test]
fn signed_tile_data_corrects_low_indices() {
    let mut video = DisplayController::new();
    // Tile 256 lives at 0x1000; tile 0 stays blank.
    fill_tile(&mut video, 256, 1);
    fill_tile(&mut video, 200, 2);
    video.write_vram(0x1800, 0);
    video.write_vram(0x1801, 200);

    video.render_scan();
    assert_eq!(video.frame().pixel(0, 0), Color::WHITE);
    assert_eq!(video.frame().pixel(8, 0), Color::DARK_GRAY);

    assert_eq!(video.tile_data(), TileData::Unsigned);
    video.set_tile_data(TileData::Signed);
    assert_eq!(video.tile_data(), TileData::Signed);
    video.render_scan();
    assert_eq!(video.frame().pixel(0, 0), Color::LIGHT_GRAY);
    assert_eq!(video.frame().pixel(8, 0), Color::DARK_GRAY);
}

#[test]
fn high_background_map_is_selectable() {
    let mut video = DisplayController::new();
    fill_tile(&mut video, 5, 3);
    video.write_vram(0x1C00, 5);

    video.render_scan();
    assert_eq!(video.frame().pixel(0, 0), Color::WHITE);

    assert_eq!(video.background_map(), BackgroundMap::Low);
    video.set_background_map(BackgroundMap::High);
    assert_eq!(video.background_map(), BackgroundMap::High);
    video.render_scan();
    assert_eq!(video.frame().pixel(0, 0), Color::BLACK);
}

#[test]
fn palette_from_bgp_reorders_shades() {
    let mut video = DisplayController::new();
    // Inverted ramp: index 0 -> black ... index 3 -> white.
    video.set_palette_from_bgp(0b00_01_10_11);
    assert_eq!(
        video.palette(),
        [Color::BLACK, Color::DARK_GRAY, Color::LIGHT_GRAY, Color::WHITE]
    );

    video.render_scan();
    assert_eq!(video.frame().pixel(0, 0), Color::BLACK);
}

#[test]
fn presented_frame_holds_rendered_lines() {
    let mut video = DisplayController::new();
    let mut sink = CountingSink::default();
    video.set_palette([Color::new_rgb(1, 2, 3); 4]);

    video.step(FRAME_TICKS, &mut sink);
    assert_eq!(sink.last_top_left, Some(Color::new_rgb(1, 2, 3)));
    assert_eq!(video.frame().pixel(159, 143), Color::new_rgb(1, 2, 3));
}

#[test]
fn oam_is_addressable_and_bounded() {
    let mut video = DisplayController::new();
    video.write_oam(0x9F, 0x42);
    assert_eq!(video.read_oam(0x9F), 0x42);

    video.write_oam(0xA0, 0x99);
    assert_eq!(video.read_oam(0xA0), 0);
}

#[test]
fn reset_clears_memory_and_timing() {
    let mut video = DisplayController::new();
    fill_tile(&mut video, 0, 3);
    video.write_oam(0, 7);
    video.step(1000, &mut NullSink);
    video.set_scroll(3, 4);

    video.reset();

    assert_eq!(video.line(), 0);
    assert_eq!(video.mode(), Mode::OamScan);
    assert_eq!(video.read_vram(0), 0);
    assert_eq!(video.read_oam(0), 0);
    assert_eq!(video.tiles().row(0, 0), &[0; 8]);
    assert_eq!(video.scroll(), (3, 4));
}

#[test]
fn mode_numbers_follow_the_line_cycle() {
    let mut video = DisplayController::new();
    let mut sink = NullSink;

    assert_eq!(video.mode().number(), 2);
    video.step(80, &mut sink);
    assert_eq!(video.mode().number(), 3);
    video.step(172, &mut sink);
    assert_eq!(video.mode().number(), 0);
    video.step(204 + 456 * 143, &mut sink);
    assert_eq!(video.line(), 144);
    assert_eq!(video.mode().number(), 1);
}

#[test]
fn step_near_u32_max_does_not_overflow() {
    let mut video = DisplayController::new();
    let mut sink = CountingSink::default();

    video.step(4, &mut sink);
    assert!(video.step(u32::MAX - 2, &mut sink));

    // 2^32 + 1 ticks = 61160 whole frames plus 67457 ticks, which reaches
    // line 147 of the blanking period.
    assert_eq!(sink.presented, 61161);
    assert_eq!(video.frame_count(), 61161);
    assert_eq!(video.line(), 147);
    assert_eq!(video.mode(), Mode::VBlank);

    // Timing keeps running normally afterwards.
    video.step(31 + 456 * 6, &mut sink);
    assert_eq!(video.line(), 0);
    assert_eq!(video.mode(), Mode::OamScan);
    assert_eq!(sink.presented, 61161);
}

#[test]
fn one_large_step_matches_many_small_steps() {
    let mut bulk = DisplayController::new();
    let mut fine = DisplayController::new();
    for video in [&mut bulk, &mut fine] {
        fill_tile(video, 1, 2);
        video.write_vram(0x1800 + 3, 1);
        video.set_scroll(5, 3);
    }

    let total = FRAME_TICKS * 5 + 1000;
    let mut bulk_sink = CountingSink::default();
    let mut fine_sink = CountingSink::default();

    bulk.step(7, &mut bulk_sink);
    bulk.step(total - 7, &mut bulk_sink);
    for _ in 0..(total / 8) {
        fine.step(8, &mut fine_sink);
    }

    assert_eq!(bulk_sink.presented, 5);
    assert_eq!(fine_sink.presented, 5);
    assert_eq!(bulk.line(), fine.line());
    assert_eq!(bulk.mode(), fine.mode());
    assert_eq!(bulk.frame_count(), fine.frame_count());
    assert!(bulk.frame() == fine.frame());
}

#[test]
fn signed_correction_reapplies_after_tile_boundary() {
    let mut video = DisplayController::new();
    fill_tile(&mut video, 200, 2);
    fill_tile(&mut video, 5, 1);
    fill_tile(&mut video, 261, 3);
    video.write_vram(0x1800, 200);
    video.write_vram(0x1801, 5);

    video.render_scan();
    assert_eq!(video.frame().pixel(8, 0), Color::LIGHT_GRAY);

    video.set_tile_data(TileData::Signed);
    video.render_scan();
    let frame = video.frame();
    for x in 0..8 {
        assert_eq!(frame.pixel(x, 0), Color::DARK_GRAY, "x={x}");
    }
    for x in 8..16 {
        assert_eq!(frame.pixel(x, 0), Color::BLACK, "x={x}");
    }
}

#[test]
fn vertical_scroll_wraps_to_first_map_row() {
    let mut video = DisplayController::new();
    fill_tile(&mut video, 7, 3);
    fill_tile(&mut video, 9, 1);
    // Map row 31 column 0, and map row 0 column 0.
    video.write_vram(0x1800 + 31 * 32, 7);
    video.write_vram(0x1800, 9);
    video.set_scroll(0, 250);

    // Line 0 + 250 lands in map row 31.
    video.render_scan();
    assert_eq!(video.frame().pixel(0, 0), Color::BLACK);

    // Line 6 + 250 = 256 wraps back to map row 0.
    video.step(456 * 6, &mut NullSink);
    assert_eq!(video.line(), 6);
    video.render_scan();
    assert_eq!(video.frame().pixel(0, 6), Color::LIGHT_GRAY);
    assert_eq!(video.frame().pixel(0, 5), Color::BLACK);
}
