use super::opcodes::{Cond, Pair, Reg8, StackPair};
use super::{Bus, Cpu, Flags};

impl Cpu {
    /// Read an 8-bit register or the byte at (HL).
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) -> u8 {
        match reg {
            Reg8::B => self.regs.b,
            Reg8::C => self.regs.c,
            Reg8::D => self.regs.d,
            Reg8::E => self.regs.e,
            Reg8::H => self.regs.h,
            Reg8::L => self.regs.l,
            Reg8::HlIndirect => bus.read8(self.regs.hl()),
            Reg8::A => self.regs.a,
        }
    }

    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, reg: Reg8, value: u8) {
        match reg {
            Reg8::B => self.regs.b = value,
            Reg8::C => self.regs.c = value,
            Reg8::D => self.regs.d = value,
            Reg8::E => self.regs.e = value,
            Reg8::H => self.regs.h = value,
            Reg8::L => self.regs.l = value,
            Reg8::HlIndirect => bus.write8(self.regs.hl(), value),
            Reg8::A => self.regs.a = value,
        }
    }

    #[inline]
    pub(super) fn read_pair(&self, pair: Pair) -> u16 {
        match pair {
            Pair::Bc => self.regs.bc(),
            Pair::De => self.regs.de(),
            Pair::Hl => self.regs.hl(),
            Pair::Sp => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_pair(&mut self, pair: Pair, value: u16) {
        match pair {
            Pair::Bc => self.regs.set_bc(value),
            Pair::De => self.regs.set_de(value),
            Pair::Hl => self.regs.set_hl(value),
            Pair::Sp => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn read_stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::Bc => self.regs.bc(),
            StackPair::De => self.regs.de(),
            StackPair::Hl => self.regs.hl(),
            StackPair::Af => self.regs.af(),
        }
    }

    #[inline]
    pub(super) fn write_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::Bc => self.regs.set_bc(value),
            StackPair::De => self.regs.set_de(value),
            StackPair::Hl => self.regs.set_hl(value),
            StackPair::Af => self.regs.set_af(value),
        }
    }

    #[inline]
    pub(super) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::NotZero => !self.get_flag(Flags::ZERO),
            Cond::Zero => self.get_flag(Flags::ZERO),
            Cond::NotCarry => !self.get_flag(Flags::CARRY),
            Cond::Carry => self.get_flag(Flags::CARRY),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a little-endian immediate word, advancing pc by two.
    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = bus.read16(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(2);
        value
    }

    /// Push a word. sp is decremented before each byte write; the high
    /// byte lands at sp+1 and the low byte at sp.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    /// Inverse of `push_u16`: low byte first, sp incremented after each read.
    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is a signed 8-bit offset relative to the address
    /// following the operand.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        let offset = self.fetch8(bus) as i8;
        if cond {
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
            3
        } else {
            2
        }
    }

    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        let addr = self.fetch16(bus);
        if cond {
            self.regs.pc = addr;
            4
        } else {
            3
        }
    }

    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        let addr = self.fetch16(bus);
        if cond {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
            6
        } else {
            3
        }
    }

    pub(super) fn ret_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        if cond {
            self.regs.pc = self.pop_u16(bus);
            5
        } else {
            2
        }
    }
}
