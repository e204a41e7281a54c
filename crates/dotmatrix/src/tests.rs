use super::*;
use dotmatrix_common::Color;

fn rom_with_entry(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

#[test]
fn run_image_keeps_last_frame() {
    // LD A,0xFF ; LD (0x8000),A ; JR -2
    let rom = rom_with_entry(&[0x3E, 0xFF, 0xEA, 0x00, 0x80, 0x18, 0xFE]);

    let sink = run_image(&rom, None, 3).unwrap();

    assert_eq!(sink.presented, 3);
    let frame = sink.frame.unwrap();
    assert_eq!(frame.pixel(0, 0), Color::LIGHT_GRAY);
    assert_eq!(frame.pixel(0, 1), Color::WHITE);
}

#[test]
fn run_image_with_bootstrap_reaches_cartridge() {
    let rom = rom_with_entry(&[0x18, 0xFE]);
    let sink = run_image(&rom, Some(&[0u8; 0][..]), 1).unwrap();
    assert_eq!(sink.presented, 1);
}

#[test]
fn run_image_reports_illegal_opcode() {
    let rom = rom_with_entry(&[0xDD]);
    let err = run_image(&rom, None, 1).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("frame 0"), "{message}");
    assert!(message.contains("0xdd"), "{message}");
}

#[test]
fn run_reports_missing_rom() {
    let options = HostOptions {
        rom_path: PathBuf::from("/nonexistent/dotmatrix/test.rom"),
        frames: 1,
        out_path: None,
        boot_rom_path: None,
    };
    let err = run(&options).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read ROM"));
}

#[test]
fn run_writes_rgba_dump() {
    let dir = std::env::temp_dir().join(format!("dotmatrix-host-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let rom_path = dir.join("spin.rom");
    let out_path = dir.join("frame.rgba");
    std::fs::write(&rom_path, rom_with_entry(&[0x18, 0xFE])).unwrap();

    let options = HostOptions {
        rom_path,
        frames: 2,
        out_path: Some(out_path.clone()),
        boot_rom_path: None,
    };
    run(&options).unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(bytes.len(), 160 * 144 * 4);
    assert_eq!(&bytes[..4], &[255, 255, 255, 255]);

    std::fs::remove_dir_all(&dir).unwrap();
}
