/// Number of 8x8 tiles addressable in video memory.
pub const TILE_COUNT: usize = 384;

type Tile = [[u8; 8]; 8];

/// Decoded copy of the tile-data area: one 2-bit color index per pixel,
/// indexed `[tile][row][column]`.
#[derive(Clone, PartialEq, Eq)]
pub struct TileCache {
    tiles: Box<[Tile; TILE_COUNT]>,
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TileCache {
    pub fn new() -> Self {
        Self {
            tiles: Box::new([[[0; 8]; 8]; TILE_COUNT]),
        }
    }

    pub fn clear(&mut self) {
        for tile in self.tiles.iter_mut() {
            *tile = [[0; 8]; 8];
        }
    }

    #[inline]
    pub fn pixel(&self, tile: usize, row: usize, col: usize) -> u8 {
        self.tiles[tile][row][col]
    }

    #[inline]
    pub fn row(&self, tile: usize, row: usize) -> &[u8; 8] {
        &self.tiles[tile][row]
    }

    /// Decode a row from its two planes. Bit 7 is the leftmost pixel; the
    /// low plane supplies bit 0 of the index, the high plane bit 1.
    pub(super) fn update_row(&mut self, tile: usize, row: usize, low: u8, high: u8) {
        let out = &mut self.tiles[tile][row];
        for (col, px) in out.iter_mut().enumerate() {
            let bit = 7 - col;
            *px = ((low >> bit) & 1) | (((high >> bit) & 1) << 1);
        }
    }
}

impl std::fmt::Debug for TileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileCache")
            .field("tiles", &TILE_COUNT)
            .finish_non_exhaustive()
    }
}
