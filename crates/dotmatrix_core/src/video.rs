//! Display controller: video memory, the decoded tile cache, the scanline
//! timing state machine and the background rasterizer.

mod render;
mod tiles;
mod timing;

pub use tiles::{TileCache, TILE_COUNT};
pub use timing::FRAME_TICKS;

use dotmatrix_common::{Color, FrameBuffer, DEFAULT_PALETTE};

pub const VRAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xA0;

/// Display controller mode, numbered the way the hardware reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    VramScan = 3,
}

impl Mode {
    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }
}

/// Which 32x32 tile map the background is drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackgroundMap {
    /// Map at VRAM offset 0x1800.
    #[default]
    Low,
    /// Map at VRAM offset 0x1C00.
    High,
}

impl BackgroundMap {
    #[inline]
    pub(crate) fn base(self) -> usize {
        match self {
            BackgroundMap::Low => 0x1800,
            BackgroundMap::High => 0x1C00,
        }
    }
}

/// How raw tile-map bytes are turned into tile numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileData {
    /// Map bytes index tiles 0..=255 directly.
    #[default]
    Unsigned,
    /// Map bytes 0..=127 select tiles 256..=383; 128..=255 select themselves.
    Signed,
}

impl TileData {
    #[inline]
    pub(crate) fn resolve(self, raw: u8) -> usize {
        match self {
            TileData::Signed if raw < 128 => raw as usize + 256,
            _ => raw as usize,
        }
    }
}

pub struct DisplayController {
    vram: Box<[u8; VRAM_SIZE]>,
    oam: [u8; OAM_SIZE],
    tiles: TileCache,
    frame: FrameBuffer,

    mode: Mode,
    /// Ticks spent in the current mode, including carried overshoot.
    modeclock: u64,
    line: u8,

    scx: u8,
    scy: u8,
    bg_map: BackgroundMap,
    tile_data: TileData,
    palette: [Color; 4],

    frames: u64,
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DisplayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayController")
            .field("mode", &self.mode)
            .field("modeclock", &self.modeclock)
            .field("line", &self.line)
            .field("scx", &self.scx)
            .field("scy", &self.scy)
            .field("bg_map", &self.bg_map)
            .field("tile_data", &self.tile_data)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl DisplayController {
    pub fn new() -> Self {
        Self {
            vram: Box::new([0; VRAM_SIZE]),
            oam: [0; OAM_SIZE],
            tiles: TileCache::new(),
            frame: FrameBuffer::new(),
            mode: Mode::OamScan,
            modeclock: 0,
            line: 0,
            scx: 0,
            scy: 0,
            bg_map: BackgroundMap::Low,
            tile_data: TileData::Unsigned,
            palette: DEFAULT_PALETTE,
            frames: 0,
        }
    }

    /// Clear video memory, the tile cache and the framebuffer, and return
    /// timing to line 0 in OAM-scan. Register settings are kept.
    pub fn reset(&mut self) {
        self.vram.fill(0);
        self.oam.fill(0);
        self.tiles.clear();
        self.frame.clear();
        self.mode = Mode::OamScan;
        self.modeclock = 0;
        self.line = 0;
        self.frames = 0;
    }

    #[inline]
    pub fn read_vram(&self, offset: u16) -> u8 {
        self.vram[(offset as usize) & (VRAM_SIZE - 1)]
    }

    /// Store a byte into video memory and refresh the tile row it belongs to.
    pub fn write_vram(&mut self, offset: u16, value: u8) {
        self.vram[(offset as usize) & (VRAM_SIZE - 1)] = value;
        self.update_tile(offset);
    }

    #[inline]
    pub fn read_oam(&self, offset: u16) -> u8 {
        self.oam.get(offset as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn write_oam(&mut self, offset: u16, value: u8) {
        if let Some(slot) = self.oam.get_mut(offset as usize) {
            *slot = value;
        }
    }

    /// Recompute one cached tile row from the byte pair containing `offset`.
    ///
    /// Offsets inside the tile-map area (tile number 384 and up) leave the
    /// cache untouched.
    pub fn update_tile(&mut self, offset: u16) {
        let base = (offset as usize) & 0x1FFE;
        let tile = base >> 4;
        if tile >= TILE_COUNT {
            return;
        }
        let row = (base >> 1) & 7;
        self.tiles
            .update_row(tile, row, self.vram[base], self.vram[base + 1]);
    }

    pub fn tiles(&self) -> &TileCache {
        &self.tiles
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Number of frames presented since power-on or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn line(&self) -> u8 {
        self.line
    }

    pub fn scroll(&self) -> (u8, u8) {
        (self.scx, self.scy)
    }

    pub fn set_scroll(&mut self, scx: u8, scy: u8) {
        self.scx = scx;
        self.scy = scy;
    }

    pub fn background_map(&self) -> BackgroundMap {
        self.bg_map
    }

    pub fn set_background_map(&mut self, map: BackgroundMap) {
        self.bg_map = map;
    }

    pub fn tile_data(&self) -> TileData {
        self.tile_data
    }

    pub fn set_tile_data(&mut self, data: TileData) {
        self.tile_data = data;
    }

    pub fn palette(&self) -> [Color; 4] {
        self.palette
    }

    pub fn set_palette(&mut self, palette: [Color; 4]) {
        self.palette = palette;
    }

    /// Load the palette from a packed shade byte: bits 2n+1..2n select the
    /// greyscale shade used for color index n.
    pub fn set_palette_from_bgp(&mut self, bgp: u8) {
        for (index, entry) in self.palette.iter_mut().enumerate() {
            let shade = (bgp >> (index * 2)) & 0x03;
            *entry = DEFAULT_PALETTE[shade as usize];
        }
    }
}

#[cfg(test)]
mod tests;
