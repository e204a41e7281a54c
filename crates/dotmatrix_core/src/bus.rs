use crate::cpu::Bus;
use crate::video::DisplayController;

pub const BOOTSTRAP_SIZE: usize = 0x100;
pub const WRAM_SIZE: usize = 0x2000;
pub const ERAM_SIZE: usize = 0x2000;
pub const ZRAM_SIZE: usize = 0x7F;

/// Address at which the bootstrap program hands control to the cartridge.
pub const BOOTSTRAP_EXIT: u16 = 0x0100;

/// The system address space.
///
/// Owns every memory region plus the display controller, and resolves each
/// 16-bit address to exactly one of them.
pub struct MemoryBus {
    bootstrap: [u8; BOOTSTRAP_SIZE],
    rom: Vec<u8>,
    wram: Box<[u8; WRAM_SIZE]>,
    eram: Box<[u8; ERAM_SIZE]>,
    zram: [u8; ZRAM_SIZE],
    /// While set, 0x0000..=0x00FF reads come from the bootstrap ROM.
    in_bootstrap: bool,
    display: DisplayController,
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBus")
            .field("rom_len", &self.rom.len())
            .field("in_bootstrap", &self.in_bootstrap)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl MemoryBus {
    pub fn new() -> Self {
        Self {
            bootstrap: [0; BOOTSTRAP_SIZE],
            rom: Vec::new(),
            wram: Box::new([0; WRAM_SIZE]),
            eram: Box::new([0; ERAM_SIZE]),
            zram: [0; ZRAM_SIZE],
            in_bootstrap: true,
            display: DisplayController::new(),
        }
    }

    /// Copy a cartridge image in verbatim. No header is interpreted.
    pub fn load_cartridge(&mut self, rom: &[u8]) {
        self.rom.clear();
        self.rom.extend_from_slice(rom);
        log::info!("bus: loaded cartridge image ({} bytes)", rom.len());
    }

    /// Install up to 256 bytes of bootstrap program. Anything beyond the
    /// first 256 bytes is ignored; a shorter image leaves the tail zeroed.
    pub fn load_bootstrap(&mut self, image: &[u8]) {
        let len = image.len().min(BOOTSTRAP_SIZE);
        self.bootstrap = [0; BOOTSTRAP_SIZE];
        self.bootstrap[..len].copy_from_slice(&image[..len]);
        if image.len() > BOOTSTRAP_SIZE {
            log::warn!(
                "bus: bootstrap image is {} bytes, only the first {} are mapped",
                image.len(),
                BOOTSTRAP_SIZE
            );
        }
        log::info!("bus: loaded bootstrap image ({len} bytes)");
    }

    /// Zero every RAM region, re-enter bootstrap mode and reset the display.
    /// The cartridge image and bootstrap program are kept.
    pub fn reset(&mut self) {
        self.wram.fill(0);
        self.eram.fill(0);
        self.zram.fill(0);
        self.in_bootstrap = true;
        self.display.reset();
    }

    #[inline]
    pub fn in_bootstrap(&self) -> bool {
        self.in_bootstrap
    }

    /// Leave bootstrap mode for good. Only `reset` maps the bootstrap ROM
    /// back in.
    pub fn exit_bootstrap(&mut self) {
        if self.in_bootstrap {
            self.in_bootstrap = false;
            log::info!("bus: bootstrap finished, cartridge ROM mapped at 0x0000");
        }
    }

    /// Report the processor's program counter after an instruction.
    pub fn observe_pc(&mut self, pc: u16) {
        if self.in_bootstrap && pc == BOOTSTRAP_EXIT {
            self.exit_bootstrap();
        }
    }

    pub fn display(&self) -> &DisplayController {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayController {
        &mut self.display
    }

    #[inline]
    fn rom_read(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0)
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00FF if self.in_bootstrap => self.bootstrap[addr as usize],
            0x0000..=0x7FFF => self.rom_read(addr),

            0x8000..=0x9FFF => self.display.read_vram(addr & 0x1FFF),

            0xA000..=0xBFFF => self.eram[(addr & 0x1FFF) as usize],

            // Work RAM and its mirror share the same 8 KiB.
            0xC000..=0xFDFF => self.wram[(addr & 0x1FFF) as usize],

            0xFE00..=0xFE9F => self.display.read_oam(addr - 0xFE00),

            0xFF80..=0xFFFE => self.zram[(addr - 0xFF80) as usize],

            // 0xFEA0..=0xFEFF and the I/O page are not wired.
            _ => 0,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {
                log::trace!("bus: ignored write 0x{value:02X} to ROM at 0x{addr:04X}");
            }

            0x8000..=0x9FFF => self.display.write_vram(addr & 0x1FFF, value),

            0xA000..=0xBFFF => self.eram[(addr & 0x1FFF) as usize] = value,

            0xC000..=0xFDFF => self.wram[(addr & 0x1FFF) as usize] = value,

            0xFE00..=0xFE9F => self.display.write_oam(addr - 0xFE00, value),

            0xFF80..=0xFFFE => self.zram[(addr - 0xFF80) as usize] = value,

            _ => {
                log::trace!("bus: ignored write 0x{value:02X} to unmapped 0x{addr:04X}");
            }
        }
    }
}

impl Bus for MemoryBus {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}
