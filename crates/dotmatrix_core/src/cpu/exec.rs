mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::opcodes::Instruction;
use super::{Bus, Cpu};

impl Cpu {
    /// Run the handler for one decoded instruction.
    ///
    /// Returns the cost in machine cycles, or `None` for the fatal handler.
    pub(super) fn exec_instruction<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: Instruction,
    ) -> Option<u32> {
        use Instruction::*;

        let m = match instr {
            Nop => 1,
            Halt => self.exec_halt(),
            Di => self.exec_di(),
            Ei => self.exec_ei(),

            LdRR { dst, src } => self.exec_ld_r_r(bus, dst, src),
            LdRImm { dst } => self.exec_ld_r_d8(bus, dst),
            LdPairImm { pair } => self.exec_ld_rr_d16(bus, pair),
            LdIndirectA { ptr } => self.exec_ld_indirect_a(bus, ptr),
            LdAIndirect { ptr } => self.exec_ld_a_indirect(bus, ptr),
            LdAbsA => self.exec_ld_a16_a(bus),
            LdAAbs => self.exec_ld_a_a16(bus),
            LdhImmA => self.exec_ldh_a8_a(bus),
            LdhAImm => self.exec_ldh_a_a8(bus),
            LdhCA => self.exec_ldh_c_a(bus),
            LdhAC => self.exec_ldh_a_c(bus),
            LdAbsSp => self.exec_ld_a16_sp(bus),
            LdSpHl => self.exec_ld_sp_hl(),
            LdHlSpOffset => self.exec_ld_hl_sp_r8(bus),
            Push { pair } => self.exec_push(bus, pair),
            Pop { pair } => self.exec_pop(bus, pair),

            Alu { op, src } => self.exec_alu_reg(bus, op, src),
            AluImm { op } => self.exec_alu_imm(bus, op),
            Inc8 { reg } => self.exec_inc8(bus, reg),
            Dec8 { reg } => self.exec_dec8(bus, reg),
            Inc16 { pair } => self.exec_inc16(pair),
            Dec16 { pair } => self.exec_dec16(pair),
            AddHl { pair } => self.exec_add_hl_rr(pair),
            AddSpOffset => self.exec_add_sp_r8(bus),
            Daa => self.exec_daa(),
            Cpl => self.exec_cpl(),
            Scf => self.exec_scf(),
            Ccf => self.exec_ccf(),
            Rotate(op) => self.exec_rotate_a(op),
            PrefixCb => self.step_cb(bus),

            Jp => self.jp_cond(bus, true),
            JpCond(cc) => self.jp_cond(bus, self.condition(cc)),
            JpHl => self.exec_jp_hl(),
            Jr => self.jr(bus, true),
            JrCond(cc) => self.jr(bus, self.condition(cc)),
            Call => self.call_cond(bus, true),
            CallCond(cc) => self.call_cond(bus, self.condition(cc)),
            Ret => self.exec_ret(bus),
            RetCond(cc) => self.ret_cond(bus, self.condition(cc)),
            Reti => self.exec_reti(bus),
            Rst(vector) => self.exec_rst(bus, vector),

            Illegal => return None,
        };
        Some(m)
    }
}
