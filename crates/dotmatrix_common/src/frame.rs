use crate::{Color, SCREEN_HEIGHT, SCREEN_WIDTH};

/// A finished (or in-progress) 160x144 RGBA picture.
///
/// Pixels are stored row-major, so pixel `(x, y)` lives at
/// `y * SCREEN_WIDTH + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[Color; SCREEN_WIDTH * SCREEN_HEIGHT]>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish_non_exhaustive()
    }
}

impl FrameBuffer {
    /// A fully black, fully transparent frame.
    pub fn new() -> Self {
        Self {
            pixels: Box::new([Color::default(); SCREEN_WIDTH * SCREEN_HEIGHT]),
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y * SCREEN_WIDTH + x] = color;
    }

    /// One scanline of pixels.
    pub fn row(&self, y: usize) -> &[Color] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Color::default());
    }

    /// Copy the frame out as tightly packed R,G,B,A bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in self.pixels.iter() {
            out.extend_from_slice(&[px.r, px.g, px.b, px.a]);
        }
        out
    }
}

/// The display surface a finished frame is handed to.
///
/// The core calls `present` exactly once per completed frame; what the
/// host does with it (blit to a window, dump to disk, compare in a test)
/// is up to the implementation.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameBuffer);
}

/// A sink that drops every frame. Useful for headless stepping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &FrameBuffer) {}
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn present(&mut self, frame: &FrameBuffer) {
        (**self).present(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_bytes_are_row_major() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(1, 0, Color::new_rgba(1, 2, 3, 4));
        frame.set_pixel(0, 1, Color::WHITE);

        let bytes = frame.to_rgba_bytes();
        assert_eq!(bytes.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 4);
        assert_eq!(&bytes[4..8], &[1, 2, 3, 4]);
        let second_row = SCREEN_WIDTH * 4;
        assert_eq!(&bytes[second_row..second_row + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn row_slices_one_scanline() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(159, 143, Color::BLACK);
        let row = frame.row(143);
        assert_eq!(row.len(), SCREEN_WIDTH);
        assert_eq!(row[159], Color::BLACK);
    }
}
