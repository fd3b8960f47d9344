use strum::Display;

// ----------------------------------------------------------------------------
// Operand kinds
//
// Every kind maps to a one-character tag; the concatenated tags of a line's
// operands form the signature used to pick a catalog row. Char literals share
// the word-immediate tag: a character is a word value wherever it appears.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperandKind {
    /// `rN`, N in 0..=15
    Register,
    /// bare literal <= 0xFFFF, `'c'`, or `@label`
    WordImm,
    /// `dN`, large bare literal, or bare label
    DwordImm,
    /// `(addr)`, 16-bit
    NearPtr,
    /// `[addr]`, 32-bit
    FarPtr,
    /// `[rX:rX+1]`
    RegPairPtr,
    /// `+N` forward displacement
    RelFwd,
    /// `-N` backward displacement
    RelBwd,
    /// `'c'`
    CharLit,
}

impl OperandKind {
    pub fn tag(self) -> char {
        match self {
            OperandKind::Register => 'R',
            OperandKind::WordImm | OperandKind::CharLit => 'W',
            OperandKind::DwordImm => 'D',
            OperandKind::NearPtr => 'n',
            OperandKind::FarPtr => 'f',
            OperandKind::RegPairPtr => 'P',
            OperandKind::RelFwd => '+',
            OperandKind::RelBwd => '-',
        }
    }
}

// ----------------------------------------------------------------------------
// Operand

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub value: u32,
}

impl Operand {
    pub fn new(kind: OperandKind, value: u32) -> Self {
        Self { kind, value }
    }
}
