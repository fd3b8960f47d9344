use std::collections::HashMap;

use once_cell::sync::Lazy;

// ----------------------------------------------------------------------------
// Opcodes

pub struct Opc;

impl Opc {
    pub const NOP: u16 = 0x00;

    pub const JMP_FAR: u16 = 0x02;
    pub const JMP_NEAR: u16 = 0x37;
    pub const JMP_REL_FWD: u16 = 0x38;
    pub const JMP_REL_BWD: u16 = 0x39;

    // I2R = indirect load, R2M = store, V2* = immediate value,
    // *2A = A register, D2R/R2D = AD transfer
    pub const MOV_I2R_NEAR: u16 = 0x03;
    pub const MOV_I2R_FAR: u16 = 0x04;
    pub const MOV_R2M_FAR: u16 = 0x05;
    pub const MOV_R2M_NEAR: u16 = 0x06;
    pub const MOV_R2R: u16 = 0x07;
    pub const MOV_R2A: u16 = 0x2F;
    pub const MOV_V2R: u16 = 0x35;
    pub const MOV_V2A: u16 = 0x36;
    pub const MOV_D2R: u16 = 0x08;
    pub const MOV_R2D: u16 = 0x0E;

    pub const ADD_RR: u16 = 0x09;
    pub const ADD_RI: u16 = 0x0C;
    pub const ADC_RR: u16 = 0x0D;

    pub const SUB_RR: u16 = 0x0F;
    pub const SUB_RI: u16 = 0x12;
    pub const SUC_RR: u16 = 0x13;

    pub const SHR_RI: u16 = 0x14;
    pub const SHL_RI: u16 = 0x15;
    pub const ROR_RI: u16 = 0x16;
    pub const ROL_RI: u16 = 0x17;

    pub const NOT_R: u16 = 0x18;
    pub const INC_R: u16 = 0x30;

    pub const AND_RR: u16 = 0x19;
    pub const AND_RI: u16 = 0x1A;
    pub const OR_RR: u16 = 0x1B;
    pub const OR_RI: u16 = 0x1C;
    pub const XOR_RR: u16 = 0x1D;
    pub const XOR_RI: u16 = 0x1E;
    pub const XNOR_RR: u16 = 0x1F;
    pub const XNOR_RI: u16 = 0x20;
    pub const NOR_RR: u16 = 0x21;
    pub const NOR_RI: u16 = 0x22;
    pub const NAND_RR: u16 = 0x23;
    pub const NAND_RI: u16 = 0x24;

    pub const PUSHB_FAR: u16 = 0x25;
    pub const PUSHW_FAR: u16 = 0x27;
    pub const PUSHW_NEAR: u16 = 0x3A;
    pub const PUSH_REG: u16 = 0x2A;

    pub const SSP: u16 = 0x29;

    pub const POP_REG: u16 = 0x2B;
    pub const POP_FAR: u16 = 0x2C;
    pub const POP_AD: u16 = 0x2E;
    pub const POP_NEAR: u16 = 0x3C;

    pub const CALL_FAR: u16 = 0x31;
    pub const CALL_NEAR: u16 = 0xE0;

    pub const RET: u16 = 0x33;
    pub const IEN: u16 = 0x3E;
    pub const SINT: u16 = 0x34;

    pub const MMOV_ST: u16 = 0x40;
    pub const MMOV_LD: u16 = 0x41;

    pub const IMOV_LD: u16 = 0x4A;
    pub const IMOV_ST: u16 = 0x4B;
    pub const IMOV_ST_IMM: u16 = 0x4C;

    pub const BRCH_FLG_FAR: u16 = 0x42;
    pub const BRCH_FLG_NEAR: u16 = 0x44;
    pub const BRCH_IV_FAR: u16 = 0x46;
    pub const BRCH_IV_NEAR: u16 = 0x48;

    // RSA = address held in register pair T,T+1
    pub const MOV_RSA: u16 = 0x4F;
    pub const IMOV_RSA: u16 = 0x4E;

    pub const MOV_PR_LD: u16 = 0x50;
    pub const MOV_PR_ST: u16 = 0x51;
    pub const IMOV_PR_LD: u16 = 0x52;
    pub const IMOV_PR_ST: u16 = 0x53;

    // Assembler-only: raw data word, no hardware opcode.
    pub const DW: u16 = 0x10FF;
}

// ----------------------------------------------------------------------------
// Catalog

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsnDef {
    pub mnemonic: &'static str,
    pub opcode: u16,
    pub words: u8,
    pub cycles: u8,
    pub sig: &'static str,
}

const fn def(
    mnemonic: &'static str,
    opcode: u16,
    words: u8,
    cycles: u8,
    sig: &'static str,
) -> InsnDef {
    InsnDef { mnemonic, opcode, words, cycles, sig }
}

/// The full instruction table. Rows sharing a mnemonic are overloads by
/// operand signature; rows sharing mnemonic *and* signature are addressing
/// variants of equal shape, disambiguated by cycle cost at selection time.
pub static CATALOG: &[InsnDef] = &[
    def("nop", Opc::NOP, 1, 1, ""),

    def("jmp", Opc::JMP_FAR, 3, 4, "D"),
    def("jmp", Opc::JMP_NEAR, 2, 4, "W"),
    def("jmp", Opc::JMP_NEAR, 2, 4, "n"),
    def("jmp", Opc::JMP_FAR, 3, 6, "n"),
    def("jmp", Opc::JMP_FAR, 3, 4, "f"),
    def("jmp", Opc::JMP_REL_FWD, 1, 2, "+"),
    def("jmp", Opc::JMP_REL_BWD, 1, 2, "-"),

    def("mov", Opc::MOV_I2R_NEAR, 2, 4, "Rn"),
    def("mov", Opc::MOV_I2R_FAR, 3, 4, "Rf"),
    def("mov", Opc::MOV_R2M_FAR, 3, 4, "fR"),
    def("mov", Opc::MOV_R2M_NEAR, 2, 4, "nR"),
    def("mov", Opc::MOV_R2R, 1, 1, "RR"),
    def("mov", Opc::MOV_R2A, 1, 1, "R"),
    def("mov", Opc::MOV_V2R, 2, 2, "RW"),
    def("mov", Opc::MOV_PR_LD, 1, 4, "RP"),
    def("mov", Opc::MOV_PR_ST, 1, 4, "PR"),
    def("mova", Opc::MOV_V2A, 2, 1, "W"),
    def("ldfa", Opc::MOV_D2R, 1, 2, "R"),
    def("stfa", Opc::MOV_R2D, 1, 2, "R"),

    def("add", Opc::ADD_RR, 1, 1, "RR"),
    def("add", Opc::ADD_RI, 2, 2, "RW"),
    def("adc", Opc::ADC_RR, 1, 1, "RR"),

    def("sub", Opc::SUB_RR, 1, 1, "RR"),
    def("sub", Opc::SUB_RI, 2, 2, "RW"),
    def("suc", Opc::SUC_RR, 1, 1, "RR"),

    def("shr", Opc::SHR_RI, 1, 1, "RW"),
    def("shl", Opc::SHL_RI, 1, 1, "RW"),
    def("ror", Opc::ROR_RI, 1, 1, "RW"),
    def("rol", Opc::ROL_RI, 1, 1, "RW"),

    def("not", Opc::NOT_R, 1, 1, "R"),
    def("inc", Opc::INC_R, 1, 1, "R"),

    def("and", Opc::AND_RR, 1, 1, "RR"),
    def("or", Opc::OR_RR, 1, 1, "RR"),
    def("nor", Opc::NOR_RR, 1, 1, "RR"),
    def("xor", Opc::XOR_RR, 1, 1, "RR"),
    def("nand", Opc::NAND_RR, 1, 1, "RR"),
    def("xnor", Opc::XNOR_RR, 1, 1, "RR"),

    def("and", Opc::AND_RI, 2, 2, "RW"),
    def("or", Opc::OR_RI, 2, 2, "RW"),
    def("nor", Opc::NOR_RI, 2, 2, "RW"),
    def("xor", Opc::XOR_RI, 2, 2, "RW"),
    def("nand", Opc::NAND_RI, 2, 2, "RW"),
    def("xnor", Opc::XNOR_RI, 2, 2, "RW"),

    def("pushb", Opc::PUSHB_FAR, 3, 5, "f"),
    def("push", Opc::PUSHW_FAR, 3, 5, "f"),
    def("push", Opc::PUSHW_NEAR, 2, 5, "n"),
    def("push", Opc::PUSH_REG, 1, 2, "R"),

    def("ssp", Opc::SSP, 3, 3, "D"),

    def("pop", Opc::POP_REG, 1, 3, "R"),
    def("pop", Opc::POP_FAR, 3, 6, "f"),
    def("pop", Opc::POP_NEAR, 2, 2, "n"),
    def("popad", Opc::POP_AD, 1, 1, ""),

    def("call", Opc::CALL_FAR, 3, 5, "D"),
    def("call", Opc::CALL_NEAR, 2, 5, "W"),
    def("call", Opc::CALL_NEAR, 2, 5, "n"),
    def("call", Opc::CALL_FAR, 3, 7, "n"),
    def("call", Opc::CALL_FAR, 3, 5, "f"),

    def("ret", Opc::RET, 1, 6, ""),
    def("ien", Opc::IEN, 1, 1, ""),
    def("sint", Opc::SINT, 1, 1, ""),

    def("mmov", Opc::MMOV_ST, 3, 4, "fR"),
    def("mmov", Opc::MMOV_LD, 3, 4, "Rf"),

    def("imov", Opc::IMOV_LD, 3, 4, "Rf"),
    def("imov", Opc::IMOV_ST, 3, 4, "fR"),
    def("imov", Opc::IMOV_ST_IMM, 4, 6, "fW"),
    def("imov", Opc::IMOV_PR_LD, 1, 4, "RP"),
    def("imov", Opc::IMOV_PR_ST, 1, 4, "PR"),

    def("brchf", Opc::BRCH_FLG_FAR, 3, 5, "DW"),
    def("brchf", Opc::BRCH_FLG_NEAR, 2, 5, "WW"),
    def("brchf", Opc::BRCH_FLG_NEAR, 2, 5, "nW"),
    def("brchf", Opc::BRCH_FLG_FAR, 3, 5, "fW"),
    def("brchi", Opc::BRCH_IV_FAR, 3, 5, "DW"),
    def("brchi", Opc::BRCH_IV_NEAR, 2, 5, "WW"),
    def("brchi", Opc::BRCH_IV_NEAR, 2, 5, "nW"),
    def("brchi", Opc::BRCH_IV_FAR, 3, 5, "fW"),

    def("emov", Opc::MOV_RSA, 1, 4, "RR"),
    def("iemov", Opc::IMOV_RSA, 1, 4, "RR"),

    def("dw", Opc::DW, 1, 1, "W"),
];

// ----------------------------------------------------------------------------
// Selection

static BY_MNEMONIC: Lazy<HashMap<&'static str, Vec<&'static InsnDef>>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Vec<&'static InsnDef>> = HashMap::new();
    for d in CATALOG {
        map.entry(d.mnemonic).or_default().push(d);
    }
    map
});

/// Find the catalog row for an exact (mnemonic, signature) match, keeping the
/// cheapest by cycle cost. The mnemonic must already be lower-cased.
pub fn select(mnemonic: &str, sig: &str) -> Option<&'static InsnDef> {
    BY_MNEMONIC
        .get(mnemonic)?
        .iter()
        .filter(|d| d.sig == sig)
        .min_by_key(|d| d.cycles)
        .copied()
}
