//! Core of the dotmatrix handheld emulator: the instruction processor, the
//! memory bus and the display controller, plus a [`Machine`] that wires them
//! together.

pub mod bus;
pub mod cpu;
pub mod machine;
pub mod video;

pub use bus::MemoryBus;
pub use cpu::{Bus, Cpu, CpuError, Cycles, Flags, Registers};
pub use machine::{Machine, MachineConfig, MachineError};
pub use video::{DisplayController, Mode};

pub use dotmatrix_common;
