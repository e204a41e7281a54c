use std::path::PathBuf;

use dotmatrix::{HostOptions, BOOT_ROM_ENV, DEFAULT_FRAMES};

const USAGE: &str = "Usage: dotmatrix <rom_path> [frames] [out_rgba_path]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("{USAGE}");
        std::process::exit(2);
    });
    let frames = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            eprintln!("Invalid frames '{arg}'; expected a non-negative integer.");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }),
        None => DEFAULT_FRAMES,
    };
    let out_path = args.next().map(PathBuf::from);
    let boot_rom_path = std::env::var_os(BOOT_ROM_ENV).map(PathBuf::from);

    let options = HostOptions {
        rom_path,
        frames,
        out_path,
        boot_rom_path,
    };
    dotmatrix::run(&options)
}
