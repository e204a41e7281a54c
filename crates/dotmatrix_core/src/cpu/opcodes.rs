use lazy_static::lazy_static;

/// 8-bit operand selected by the three-bit register field of an opcode.
///
/// The encoding is the usual table order: 0=B, 1=C, 2=D, 3=E, 4=H, 5=L,
/// 6=(HL), 7=A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlIndirect,
    A,
}

impl Reg8 {
    pub const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            6 => Reg8::HlIndirect,
            _ => Reg8::A,
        }
    }

    #[inline]
    pub const fn is_memory(self) -> bool {
        matches!(self, Reg8::HlIndirect)
    }
}

/// 16-bit pair used by loads and 16-bit arithmetic (`rp` encoding).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pair {
    Bc,
    De,
    Hl,
    Sp,
}

/// 16-bit pair used by PUSH/POP (`rp2` encoding, AF instead of SP).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    Bc,
    De,
    Hl,
    Af,
}

/// Pointer operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    Bc,
    De,
    HlIncrement,
    HlDecrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotateA {
    Rlca,
    Rrca,
    Rla,
    Rra,
}

/// Decoded form of a single opcode byte.
///
/// Every byte maps to exactly one variant; bytes with no defined
/// behaviour map to `Illegal`, which halts the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Halt,
    Di,
    Ei,

    LdRR { dst: Reg8, src: Reg8 },
    LdRImm { dst: Reg8 },
    LdPairImm { pair: Pair },
    LdIndirectA { ptr: Indirect },
    LdAIndirect { ptr: Indirect },
    LdAbsA,
    LdAAbs,
    LdhImmA,
    LdhAImm,
    LdhCA,
    LdhAC,
    LdAbsSp,
    LdSpHl,
    LdHlSpOffset,
    Push { pair: StackPair },
    Pop { pair: StackPair },

    Alu { op: AluOp, src: Reg8 },
    AluImm { op: AluOp },
    Inc8 { reg: Reg8 },
    Dec8 { reg: Reg8 },
    Inc16 { pair: Pair },
    Dec16 { pair: Pair },
    AddHl { pair: Pair },
    AddSpOffset,
    Daa,
    Cpl,
    Scf,
    Ccf,
    Rotate(RotateA),
    PrefixCb,

    Jp,
    JpCond(Cond),
    JpHl,
    Jr,
    JrCond(Cond),
    Call,
    CallCond(Cond),
    Ret,
    RetCond(Cond),
    Reti,
    Rst(u8),

    Illegal,
}

/// Opcode bytes that hard-lock the processor.
///
/// Eleven of these are undefined holes in the instruction set. 0x10 is
/// STOP, a defined instruction that is intentionally left unimplemented:
/// no input line exists to wake the processor from it, so it is routed
/// to the same fatal handler.
pub const ILLEGAL_OPCODES: [u8; 12] = [
    0x10, 0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

const fn pair(index: u8) -> Pair {
    match index & 0x03 {
        0 => Pair::Bc,
        1 => Pair::De,
        2 => Pair::Hl,
        _ => Pair::Sp,
    }
}

const fn stack_pair(index: u8) -> StackPair {
    match index & 0x03 {
        0 => StackPair::Bc,
        1 => StackPair::De,
        2 => StackPair::Hl,
        _ => StackPair::Af,
    }
}

const fn indirect(index: u8) -> Indirect {
    match index & 0x03 {
        0 => Indirect::Bc,
        1 => Indirect::De,
        2 => Indirect::HlIncrement,
        _ => Indirect::HlDecrement,
    }
}

const fn cond(index: u8) -> Cond {
    match index & 0x03 {
        0 => Cond::NotZero,
        1 => Cond::Zero,
        2 => Cond::NotCarry,
        _ => Cond::Carry,
    }
}

const fn alu_op(index: u8) -> AluOp {
    match index & 0x07 {
        0 => AluOp::Add,
        1 => AluOp::Adc,
        2 => AluOp::Sub,
        3 => AluOp::Sbc,
        4 => AluOp::And,
        5 => AluOp::Xor,
        6 => AluOp::Or,
        _ => AluOp::Cp,
    }
}

/// Decode one opcode byte.
pub const fn decode(opcode: u8) -> Instruction {
    use Instruction::*;

    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;

    match opcode {
        0x00 => Nop,
        0x76 => Halt,
        0xF3 => Di,
        0xFB => Ei,

        0x01 | 0x11 | 0x21 | 0x31 => LdPairImm { pair: pair(p) },
        0x02 | 0x12 | 0x22 | 0x32 => LdIndirectA { ptr: indirect(p) },
        0x0A | 0x1A | 0x2A | 0x3A => LdAIndirect { ptr: indirect(p) },
        0x03 | 0x13 | 0x23 | 0x33 => Inc16 { pair: pair(p) },
        0x0B | 0x1B | 0x2B | 0x3B => Dec16 { pair: pair(p) },
        0x09 | 0x19 | 0x29 | 0x39 => AddHl { pair: pair(p) },
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => Inc8 {
            reg: Reg8::from_index(y),
        },
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => Dec8 {
            reg: Reg8::from_index(y),
        },
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => LdRImm {
            dst: Reg8::from_index(y),
        },

        0x07 => Rotate(RotateA::Rlca),
        0x0F => Rotate(RotateA::Rrca),
        0x17 => Rotate(RotateA::Rla),
        0x1F => Rotate(RotateA::Rra),
        0x27 => Daa,
        0x2F => Cpl,
        0x37 => Scf,
        0x3F => Ccf,

        0x08 => LdAbsSp,
        0x18 => Jr,
        0x20 | 0x28 | 0x30 | 0x38 => JrCond(cond(y)),

        0x40..=0x7F => LdRR {
            dst: Reg8::from_index(y),
            src: Reg8::from_index(z),
        },
        0x80..=0xBF => Alu {
            op: alu_op(y),
            src: Reg8::from_index(z),
        },

        0xC0 | 0xC8 | 0xD0 | 0xD8 => RetCond(cond(y)),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Pop { pair: stack_pair(p) },
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Push { pair: stack_pair(p) },
        0xC2 | 0xCA | 0xD2 | 0xDA => JpCond(cond(y)),
        0xC4 | 0xCC | 0xD4 | 0xDC => CallCond(cond(y)),
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => AluImm { op: alu_op(y) },
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => Rst(opcode & 0x38),

        0xC3 => Jp,
        0xC9 => Ret,
        0xCB => PrefixCb,
        0xCD => Call,
        0xD9 => Reti,
        0xE0 => LdhImmA,
        0xF0 => LdhAImm,
        0xE2 => LdhCA,
        0xF2 => LdhAC,
        0xE8 => AddSpOffset,
        0xF8 => LdHlSpOffset,
        0xE9 => JpHl,
        0xF9 => LdSpHl,
        0xEA => LdAbsA,
        0xFA => LdAAbs,

        _ => Illegal,
    }
}

fn build_table() -> [Instruction; 256] {
    let mut table = [Instruction::Illegal; 256];
    for (opcode, slot) in table.iter_mut().enumerate() {
        *slot = decode(opcode as u8);
    }

    let fatal = table
        .iter()
        .filter(|instr| **instr == Instruction::Illegal)
        .count();
    assert_eq!(
        fatal,
        ILLEGAL_OPCODES.len(),
        "opcode table has {fatal} fatal entries, expected {}",
        ILLEGAL_OPCODES.len()
    );
    log::debug!(
        "opcode table built: {} handlers, {} fatal entries",
        256 - fatal,
        fatal
    );
    table
}

lazy_static! {
    /// The 256-entry dispatch table, decoded once on first use.
    pub static ref OPCODE_TABLE: [Instruction; 256] = build_table();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_outside_the_fatal_set_has_a_handler() {
        for opcode in 0..=255u8 {
            let instr = OPCODE_TABLE[opcode as usize];
            if ILLEGAL_OPCODES.contains(&opcode) {
                assert_eq!(instr, Instruction::Illegal, "opcode {opcode:#04x}");
            } else {
                assert_ne!(instr, Instruction::Illegal, "opcode {opcode:#04x}");
            }
        }
    }

    #[test]
    fn register_fields_decode_in_table_order() {
        assert_eq!(
            decode(0x83),
            Instruction::Alu {
                op: AluOp::Add,
                src: Reg8::E
            }
        );
        assert_eq!(
            decode(0xB8),
            Instruction::Alu {
                op: AluOp::Cp,
                src: Reg8::B
            }
        );
        assert_eq!(
            decode(0x7E),
            Instruction::LdRR {
                dst: Reg8::A,
                src: Reg8::HlIndirect
            }
        );
        assert_eq!(decode(0xF5), Instruction::Push { pair: StackPair::Af });
        assert_eq!(decode(0xE1), Instruction::Pop { pair: StackPair::Hl });
        assert_eq!(decode(0xDF), Instruction::Rst(0x18));
    }
}
