use dotmatrix_common::{Color, FrameSink, NullSink, DEFAULT_PALETTE};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::bus::{MemoryBus, BOOTSTRAP_EXIT};
use crate::cpu::{Cpu, CpuError, Cycles};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    Cpu(#[from] CpuError),
}

/// Power-on options for a [`Machine`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MachineConfig {
    /// Start at the cartridge entry point with the bootstrap ROM unmapped.
    #[builder(default = false)]
    pub skip_bootstrap: bool,
    #[builder(default = DEFAULT_PALETTE)]
    pub palette: [Color; 4],
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Processor, bus and display wired together, driving frames into `S`.
pub struct Machine<S: FrameSink = NullSink> {
    pub cpu: Cpu,
    pub bus: MemoryBus,
    sink: S,
    config: MachineConfig,
}

impl Machine<NullSink> {
    /// A headless machine that discards finished frames.
    pub fn headless(config: MachineConfig) -> Self {
        Self::new(config, NullSink)
    }
}

impl<S: FrameSink> Machine<S> {
    pub fn new(config: MachineConfig, sink: S) -> Self {
        let mut machine = Self {
            cpu: Cpu::new(),
            bus: MemoryBus::new(),
            sink,
            config,
        };
        machine.apply_config();
        machine
    }

    fn apply_config(&mut self) {
        self.bus.display_mut().set_palette(self.config.palette);
        if self.config.skip_bootstrap {
            self.bus.exit_bootstrap();
            self.cpu.regs.pc = BOOTSTRAP_EXIT;
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn load_cartridge(&mut self, rom: &[u8]) {
        self.bus.load_cartridge(rom);
    }

    pub fn load_bootstrap(&mut self, image: &[u8]) {
        self.bus.load_bootstrap(image);
    }

    /// Return processor and bus to power-on state. Loaded images are kept
    /// and the configuration is applied again.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.apply_config();
    }

    /// Execute one instruction and feed its cost to the display.
    pub fn step(&mut self) -> Result<Cycles, MachineError> {
        self.step_inner().map(|(cycles, _)| cycles)
    }

    fn step_inner(&mut self) -> Result<(Cycles, bool), MachineError> {
        let cycles = self.cpu.step(&mut self.bus)?;
        self.bus.observe_pc(self.cpu.regs.pc);
        let presented = self
            .bus
            .display_mut()
            .step(cycles.t, &mut self.sink);
        Ok((cycles, presented))
    }

    /// Step until the display has presented one frame.
    ///
    /// Returns the total cost of the instructions executed.
    pub fn run_frame(&mut self) -> Result<Cycles, MachineError> {
        let mut total = Cycles::default();
        loop {
            let (cycles, presented) = self.step_inner()?;
            total.m += cycles.m;
            total.t += cycles.t;
            if presented {
                return Ok(total);
            }
        }
    }
}
