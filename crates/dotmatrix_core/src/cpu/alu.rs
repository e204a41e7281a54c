use super::{Cpu, Flags};

/// Result of an 8-bit addition or subtraction before it is written back.
///
/// `full` is the unmasked value; every flag is evaluated against it and
/// only then is the result masked to eight bits.
struct Wide {
    full: i16,
    half: i16,
}

impl Wide {
    #[inline]
    fn masked(&self) -> u8 {
        (self.full & 0xFF) as u8
    }
}

impl Cpu {
    fn wide_add(&self, value: u8, use_carry: bool) -> Wide {
        let carry_in = (use_carry && self.get_flag(Flags::CARRY)) as i16;
        let a = self.regs.a as i16;
        let value = value as i16;
        Wide {
            full: a + value + carry_in,
            half: (a & 0x0F) + (value & 0x0F) + carry_in,
        }
    }

    fn wide_sub(&self, value: u8, use_carry: bool) -> Wide {
        let carry_in = (use_carry && self.get_flag(Flags::CARRY)) as i16;
        let a = self.regs.a as i16;
        let value = value as i16;
        Wide {
            full: a - value - carry_in,
            half: (a & 0x0F) - (value & 0x0F) - carry_in,
        }
    }

    /// Apply the arithmetic flag contract shared by every add/sub handler.
    fn set_arith_flags(&mut self, wide: &Wide, subtract: bool) {
        self.clear_flags();
        self.set_flag(Flags::ZERO, wide.masked() == 0);
        self.set_flag(Flags::SUBTRACT, subtract);
        if subtract {
            self.set_flag(Flags::HALF_CARRY, wide.half < 0);
            self.set_flag(Flags::CARRY, wide.full < 0);
        } else {
            self.set_flag(Flags::HALF_CARRY, wide.half > 0x0F);
            self.set_flag(Flags::CARRY, wide.full > 0xFF);
        }
    }

    /// ADD/ADC into A. `use_carry` selects ADC.
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let wide = self.wide_add(value, use_carry);
        self.set_arith_flags(&wide, false);
        self.regs.a = wide.masked();
    }

    /// SUB/SBC from A. `use_carry` selects SBC.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let wide = self.wide_sub(value, use_carry);
        self.set_arith_flags(&wide, true);
        self.regs.a = wide.masked();
    }

    /// Compare: flags as for `A - value`, A is left untouched.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        let wide = self.wide_sub(value, false);
        self.set_arith_flags(&wide, true);
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.regs.a = result;

        self.clear_flags();
        self.set_flag(Flags::ZERO, result == 0);
        self.set_flag(Flags::HALF_CARRY, true);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.regs.a = result;

        self.clear_flags();
        self.set_flag(Flags::ZERO, result == 0);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.regs.a = result;

        self.clear_flags();
        self.set_flag(Flags::ZERO, result == 0);
    }

    /// Decimal adjust A after a BCD add or subtract.
    ///
    /// Updates Z, H and C; N is left as the previous operation set it.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust: u8 = if self.get_flag(Flags::CARRY) { 0x60 } else { 0x00 };
        if self.get_flag(Flags::HALF_CARRY) {
            adjust |= 0x06;
        }

        if !self.get_flag(Flags::SUBTRACT) {
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }

        self.set_flag(Flags::CARRY, adjust >= 0x60);
        self.set_flag(Flags::HALF_CARRY, false);
        self.set_flag(Flags::ZERO, a == 0);
        self.regs.a = a;
    }

    /// INC r / INC (HL). Carry is preserved.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flags::ZERO, result == 0);
        self.set_flag(Flags::SUBTRACT, false);
        self.set_flag(Flags::HALF_CARRY, (value & 0x0F) == 0x0F);
        result
    }

    /// DEC r / DEC (HL). Carry is preserved.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flags::ZERO, result == 0);
        self.set_flag(Flags::SUBTRACT, true);
        self.set_flag(Flags::HALF_CARRY, (value & 0x0F) == 0);
        result
    }

    /// ADD HL,rr. Zero is preserved; H and C come from bits 11 and 15.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        self.set_flag(Flags::SUBTRACT, false);
        self.set_flag(Flags::HALF_CARRY, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flags::CARRY, (hl as u32) + (value as u32) > 0xFFFF);
        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// Base plus signed 8-bit offset, used by ADD SP,r8 and LD HL,SP+r8.
    ///
    /// Z and N are cleared; H and C come from the low byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.clear_flags();
        self.set_flag(Flags::HALF_CARRY, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_flag(Flags::CARRY, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        base.wrapping_add(offset)
    }
}
