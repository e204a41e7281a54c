use crate::cpu::opcodes::{AluOp, Pair, Reg8, RotateA};
use crate::cpu::{Bus, Cpu, Flags};

impl Cpu {
    fn apply_alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    pub(super) fn exec_alu_reg<B: Bus>(&mut self, bus: &mut B, op: AluOp, src: Reg8) -> u32 {
        let value = self.read_reg8(bus, src);
        self.apply_alu(op, value);

        if src.is_memory() { 2 } else { 1 }
    }

    pub(super) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, op: AluOp) -> u32 {
        let value = self.fetch8(bus);
        self.apply_alu(op, value);
        2
    }

    /// RLCA/RRCA/RLA/RRA. Unlike the CB-prefixed forms, Z is always cleared.
    pub(super) fn exec_rotate_a(&mut self, op: RotateA) -> u32 {
        let a = self.regs.a;
        let carry_in = self.get_flag(Flags::CARRY);

        let (result, carry_out) = match op {
            RotateA::Rlca => (a.rotate_left(1), a & 0x80 != 0),
            RotateA::Rrca => (a.rotate_right(1), a & 0x01 != 0),
            RotateA::Rla => ((a << 1) | carry_in as u8, a & 0x80 != 0),
            RotateA::Rra => ((a >> 1) | ((carry_in as u8) << 7), a & 0x01 != 0),
        };

        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flags::CARRY, carry_out);
        1
    }

    pub(super) fn exec_add_hl_rr(&mut self, pair: Pair) -> u32 {
        let value = self.read_pair(pair);
        self.alu_add16_hl(value);
        2
    }

    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
        4
    }

    pub(super) fn exec_daa(&mut self) -> u32 {
        self.alu_daa();
        1
    }

    pub(super) fn exec_cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.set_flag(Flags::HALF_CARRY, true);
        self.set_flag(Flags::SUBTRACT, true);
        1
    }

    pub(super) fn exec_scf(&mut self) -> u32 {
        self.set_flag(Flags::CARRY, true);
        self.set_flag(Flags::HALF_CARRY, false);
        self.set_flag(Flags::SUBTRACT, false);
        1
    }

    pub(super) fn exec_ccf(&mut self) -> u32 {
        let carry = self.get_flag(Flags::CARRY);
        self.set_flag(Flags::CARRY, !carry);
        self.set_flag(Flags::HALF_CARRY, false);
        self.set_flag(Flags::SUBTRACT, false);
        1
    }
}
