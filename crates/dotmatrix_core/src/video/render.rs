use dotmatrix_common::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::DisplayController;

impl DisplayController {
    /// Rasterize the background for the current scanline into the frame.
    pub fn render_scan(&mut self) {
        let line = self.line as usize;
        if line >= SCREEN_HEIGHT {
            return;
        }

        let y = self.line.wrapping_add(self.scy);
        let map_row = self.bg_map.base() + ((y as usize) >> 3) * 32;
        let tile_row = (y & 7) as usize;

        let mut map_col = (self.scx >> 3) as usize;
        let mut px = (self.scx & 7) as usize;
        let mut tile = self.tile_data.resolve(self.vram[map_row + map_col]);

        for x in 0..SCREEN_WIDTH {
            let index = self.tiles.pixel(tile, tile_row, px);
            self.frame.set_pixel(x, line, self.palette[index as usize]);

            px += 1;
            if px == 8 {
                px = 0;
                map_col = (map_col + 1) & 31;
                tile = self.tile_data.resolve(self.vram[map_row + map_col]);
            }
        }
    }
}
