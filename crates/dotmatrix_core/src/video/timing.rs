use dotmatrix_common::FrameSink;

use super::{DisplayController, Mode};

const OAM_SCAN_TICKS: u32 = 80;
const VRAM_SCAN_TICKS: u32 = 172;
const HBLANK_TICKS: u32 = 204;
const VBLANK_LINE_TICKS: u32 = 456;

/// First line of the vertical blanking period.
const VBLANK_START_LINE: u8 = 144;
const LAST_LINE: u8 = 153;

/// Ticks in one full 154-line pass.
pub const FRAME_TICKS: u32 = 154 * VBLANK_LINE_TICKS;

impl Mode {
    #[inline]
    fn duration(self) -> u32 {
        match self {
            Mode::OamScan => OAM_SCAN_TICKS,
            Mode::VramScan => VRAM_SCAN_TICKS,
            Mode::HBlank => HBLANK_TICKS,
            Mode::VBlank => VBLANK_LINE_TICKS,
        }
    }
}

impl DisplayController {
    /// Advance the timing state machine by `ticks`.
    ///
    /// Ticks beyond a mode's threshold carry into the next mode, so a single
    /// call may cross several transitions. Returns `true` if at least one
    /// frame was handed to `sink` during this call.
    pub fn step<S: FrameSink + ?Sized>(&mut self, ticks: u32, sink: &mut S) -> bool {
        let frames_before = self.frames;
        self.modeclock += u64::from(ticks);

        let frame_ticks = u64::from(FRAME_TICKS);
        while self.modeclock >= u64::from(self.mode.duration()) {
            if self.at_frame_start() && self.modeclock >= 2 * frame_ticks {
                // Video memory cannot change inside one call, so every pass
                // after a complete one draws the same picture.
                self.modeclock -= frame_ticks;
                self.run_pass(sink);
                let repeats = self.modeclock / frame_ticks;
                self.modeclock -= repeats * frame_ticks;
                for _ in 0..repeats {
                    self.present(sink);
                }
                continue;
            }

            self.modeclock -= u64::from(self.mode.duration());
            self.advance_mode(sink);
        }
        self.frames != frames_before
    }

    #[inline]
    fn at_frame_start(&self) -> bool {
        self.line == 0 && self.mode == Mode::OamScan
    }

    /// Walk one full 154-line pass from the start of a frame.
    fn run_pass<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        let mut remaining = FRAME_TICKS;
        while remaining > 0 {
            remaining -= self.mode.duration();
            self.advance_mode(sink);
        }
    }

    fn present<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        self.frames += 1;
        log::debug!("video: vblank, presenting frame {}", self.frames);
        sink.present(&self.frame);
    }

    fn advance_mode<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        match self.mode {
            Mode::OamScan => {
                self.mode = Mode::VramScan;
            }
            Mode::VramScan => {
                self.render_scan();
                self.mode = Mode::HBlank;
            }
            Mode::HBlank => {
                self.line += 1;
                if self.line == VBLANK_START_LINE {
                    self.mode = Mode::VBlank;
                    self.present(sink);
                } else {
                    self.mode = Mode::OamScan;
                }
            }
            Mode::VBlank => {
                self.line += 1;
                if self.line > LAST_LINE {
                    self.line = 0;
                    self.mode = Mode::OamScan;
                }
            }
        }
    }
}
