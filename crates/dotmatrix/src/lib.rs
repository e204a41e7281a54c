use std::path::PathBuf;

use anyhow::{Context, Result};
use dotmatrix_common::{FrameBuffer, FrameSink};
use dotmatrix_core::{Machine, MachineConfig};

/// Environment variable naming an optional bootstrap ROM image.
pub const BOOT_ROM_ENV: &str = "DOTMATRIX_BOOT_ROM";

pub const DEFAULT_FRAMES: u32 = 60;

/// What the headless host should do.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub rom_path: PathBuf,
    pub frames: u32,
    /// Where to dump the last presented frame as raw RGBA, if anywhere.
    pub out_path: Option<PathBuf>,
    pub boot_rom_path: Option<PathBuf>,
}

/// Keeps a copy of the most recently presented frame.
#[derive(Debug, Default)]
pub struct LastFrame {
    pub frame: Option<FrameBuffer>,
    pub presented: u64,
}

impl FrameSink for LastFrame {
    fn present(&mut self, frame: &FrameBuffer) {
        self.presented += 1;
        match self.frame.as_mut() {
            Some(last) => last.clone_from(frame),
            None => self.frame = Some(frame.clone()),
        }
    }
}

/// Run a cartridge image for `frames` frames and return the sink holding
/// the last picture.
pub fn run_image(rom: &[u8], boot_rom: Option<&[u8]>, frames: u32) -> Result<LastFrame> {
    let config = MachineConfig::builder()
        .skip_bootstrap(boot_rom.is_none())
        .build();
    let mut machine = Machine::new(config, LastFrame::default());
    machine.load_cartridge(rom);
    if let Some(image) = boot_rom {
        machine.load_bootstrap(image);
    }

    for frame in 0..frames {
        machine
            .run_frame()
            .with_context(|| format!("emulation stopped during frame {frame}"))?;
    }
    log::info!(
        "ran {} frames, {} machine cycles",
        frames,
        machine.cpu.clock.m
    );

    Ok(machine.into_sink())
}

pub fn run(options: &HostOptions) -> Result<()> {
    let rom = std::fs::read(&options.rom_path)
        .with_context(|| format!("failed to read ROM '{}'", options.rom_path.display()))?;
    log::info!("Playing ROM path: '{}'", options.rom_path.display());

    let boot_rom = match &options.boot_rom_path {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("failed to read bootstrap ROM '{}'", path.display()))?,
        ),
        None => None,
    };

    let sink = run_image(&rom, boot_rom.as_deref(), options.frames)?;

    if let Some(out_path) = &options.out_path {
        let bytes = sink
            .frame
            .as_ref()
            .map(FrameBuffer::to_rgba_bytes)
            .unwrap_or_else(|| FrameBuffer::new().to_rgba_bytes());
        std::fs::write(out_path, &bytes)
            .with_context(|| format!("failed to write '{}'", out_path.display()))?;
        println!(
            "Wrote {} bytes ({}x{} rgba) after {} frames to '{}'",
            bytes.len(),
            dotmatrix_common::SCREEN_WIDTH,
            dotmatrix_common::SCREEN_HEIGHT,
            sink.presented,
            out_path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests;
