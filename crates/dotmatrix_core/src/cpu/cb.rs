use super::opcodes::Reg8;
use super::{Bus, Cpu, Flags};

impl Cpu {
    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    ///
    /// The second byte is fully regular, so it is decoded by field rather
    /// than through a second table.
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let cb = self.fetch8(bus);
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let reg = Reg8::from_index(cb);
        let value = self.read_reg8(bus, reg);

        match x {
            0 => {
                let carry_in = self.get_flag(Flags::CARRY);
                let (result, carry_out) = match y {
                    // RLC
                    0 => (value.rotate_left(1), value & 0x80 != 0),
                    // RRC
                    1 => (value.rotate_right(1), value & 0x01 != 0),
                    // RL
                    2 => ((value << 1) | carry_in as u8, value & 0x80 != 0),
                    // RR
                    3 => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
                    // SLA
                    4 => (value << 1, value & 0x80 != 0),
                    // SRA
                    5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
                    // SWAP
                    6 => (value.rotate_left(4), false),
                    // SRL
                    _ => (value >> 1, value & 0x01 != 0),
                };

                self.clear_flags();
                self.set_flag(Flags::ZERO, result == 0);
                self.set_flag(Flags::CARRY, carry_out);
                self.write_reg8(bus, reg, result);

                if reg.is_memory() { 4 } else { 2 }
            }
            1 => {
                // BIT: C preserved, H set, N cleared.
                let bit_set = value & (1 << y) != 0;
                self.set_flag(Flags::ZERO, !bit_set);
                self.set_flag(Flags::SUBTRACT, false);
                self.set_flag(Flags::HALF_CARRY, true);

                if reg.is_memory() { 3 } else { 2 }
            }
            2 => {
                self.write_reg8(bus, reg, value & !(1 << y));
                if reg.is_memory() { 4 } else { 2 }
            }
            _ => {
                self.write_reg8(bus, reg, value | (1 << y));
                if reg.is_memory() { 4 } else { 2 }
            }
        }
    }
}
