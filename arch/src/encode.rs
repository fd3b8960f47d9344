use crate::insn::Opc;

/// The words of one assembled line. Label-only and blank lines assemble to
/// an empty word list and occupy no space in the image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssembledInsn {
    pub words: Vec<u16>,
}

impl AssembledInsn {
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    pub fn byte_len(&self) -> u32 {
        self.words.len() as u32 * 2
    }
}

fn hi(v: u32) -> u16 {
    (v >> 16) as u16
}

fn lo(v: u32) -> u16 {
    v as u16
}

/// Low nibble of an operand, placed at `shift`.
fn nib(v: u32, shift: u32) -> u16 {
    ((v & 0xF) as u16) << shift
}

/// Pack one instruction into its words. `opcode` must be a catalog opcode and
/// `p` holds the operand values in source order; unused slots are ignored.
///
/// Panics on an opcode outside the catalog. Selection only ever hands over
/// catalog rows, so an unknown opcode here is a table bug, not user input.
pub fn encode(opcode: u16, p: [u32; 4]) -> AssembledInsn {
    let words = match opcode {
        Opc::NOP | Opc::RET | Opc::IEN | Opc::SINT | Opc::POP_AD => vec![opcode],

        // far address: upper word first
        Opc::JMP_FAR
        | Opc::CALL_FAR
        | Opc::PUSHB_FAR
        | Opc::PUSHW_FAR
        | Opc::SSP
        | Opc::POP_FAR => vec![opcode, hi(p[0]), lo(p[0])],

        Opc::JMP_NEAR | Opc::CALL_NEAR | Opc::PUSHW_NEAR | Opc::POP_NEAR | Opc::MOV_V2A => {
            vec![opcode, lo(p[0])]
        }

        Opc::JMP_REL_FWD | Opc::JMP_REL_BWD => vec![opcode | ((p[0] & 0xFF) as u16) << 8],

        Opc::MOV_I2R_NEAR => vec![opcode | nib(p[0], 8), lo(p[1])],
        Opc::MOV_I2R_FAR => vec![opcode | nib(p[0], 8), hi(p[1]), lo(p[1])],
        Opc::MOV_R2M_FAR => vec![opcode | nib(p[1], 8), hi(p[0]), lo(p[0])],
        Opc::MOV_R2M_NEAR => vec![opcode | nib(p[1], 8), lo(p[0])],

        Opc::MOV_R2R
        | Opc::ADD_RR
        | Opc::ADC_RR
        | Opc::SUB_RR
        | Opc::SUC_RR
        | Opc::AND_RR
        | Opc::OR_RR
        | Opc::NOR_RR
        | Opc::XOR_RR
        | Opc::NAND_RR
        | Opc::XNOR_RR
        | Opc::SHR_RI
        | Opc::SHL_RI
        | Opc::ROR_RI
        | Opc::ROL_RI => vec![opcode | nib(p[0], 8) | nib(p[1], 12)],

        Opc::MOV_R2A => vec![opcode | nib(p[0], 12)],

        Opc::MOV_V2R
        | Opc::ADD_RI
        | Opc::SUB_RI
        | Opc::AND_RI
        | Opc::OR_RI
        | Opc::NOR_RI
        | Opc::XOR_RI
        | Opc::NAND_RI
        | Opc::XNOR_RI => vec![opcode | nib(p[0], 8), lo(p[1])],

        Opc::NOT_R
        | Opc::INC_R
        | Opc::MOV_D2R
        | Opc::MOV_R2D
        | Opc::PUSH_REG
        | Opc::POP_REG => vec![opcode | nib(p[0], 8)],

        Opc::MMOV_ST | Opc::IMOV_ST => vec![opcode | nib(p[1], 8), hi(p[0]), lo(p[0])],
        Opc::MMOV_LD | Opc::IMOV_LD => vec![opcode | nib(p[0], 8), hi(p[1]), lo(p[1])],
        Opc::IMOV_ST_IMM => vec![opcode, lo(p[1]), hi(p[0]), lo(p[0])],

        Opc::BRCH_FLG_FAR => vec![opcode | nib(p[1], 12), hi(p[0]), lo(p[0])],
        // near branches reuse the far opcode word and drop the upper address
        Opc::BRCH_FLG_NEAR => vec![Opc::BRCH_FLG_FAR | nib(p[1], 12), lo(p[0])],
        Opc::BRCH_IV_FAR => {
            vec![opcode | ((p[1] & 0xFF) as u16) << 8, hi(p[0]), lo(p[0])]
        }
        Opc::BRCH_IV_NEAR => {
            vec![Opc::BRCH_IV_FAR | ((p[1] & 0xFF) as u16) << 8, lo(p[0])]
        }

        Opc::MOV_RSA | Opc::IMOV_RSA => vec![opcode | nib(p[0], 12) | nib(p[1], 8)],

        Opc::MOV_PR_LD | Opc::IMOV_PR_LD => vec![opcode | nib(p[1], 12) | nib(p[0], 8)],
        Opc::MOV_PR_ST | Opc::IMOV_PR_ST => vec![opcode | nib(p[0], 12) | nib(p[1], 8)],

        Opc::DW => vec![lo(p[0])],

        _ => panic!("encode: opcode {:#06X} is not in the catalog", opcode),
    };
    AssembledInsn { words }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_encode {
        ($($name:ident: ($opcode:expr, [$($p:expr),*]) => [$($w:expr),+],)*) => {
            $(
                #[test]
                fn $name() {
                    let mut p = [0u32; 4];
                    let given = [$($p as u32),*];
                    p[..given.len()].copy_from_slice(&given);
                    assert_eq!(encode($opcode, p).words, vec![$($w as u16),+]);
                }
            )*
        }
    }

    test_encode! {
        enc_nop: (Opc::NOP, []) => [0x0000],
        enc_ret: (Opc::RET, []) => [0x0033],
        enc_jmp_far: (Opc::JMP_FAR, [0x0001_2345]) => [0x0002, 0x0001, 0x2345],
        enc_jmp_near: (Opc::JMP_NEAR, [0x0042]) => [0x0037, 0x0042],
        enc_jmp_rel_fwd: (Opc::JMP_REL_FWD, [6]) => [0x0638],
        enc_jmp_rel_bwd: (Opc::JMP_REL_BWD, [3]) => [0x0339],
        enc_mova: (Opc::MOV_V2A, [0x1234]) => [0x0036, 0x1234],
        enc_mov_v2r: (Opc::MOV_V2R, [5, 0xBEEF]) => [0x0535, 0xBEEF],
        enc_mov_r2r: (Opc::MOV_R2R, [3, 7]) => [0x7307],
        enc_mov_r2a: (Opc::MOV_R2A, [9]) => [0x902F],
        enc_mov_load_far: (Opc::MOV_I2R_FAR, [2, 0x0001_0004]) => [0x0204, 0x0001, 0x0004],
        enc_mov_store_near: (Opc::MOV_R2M_NEAR, [0x0080, 6]) => [0x0606, 0x0080],
        enc_add_rr: (Opc::ADD_RR, [1, 2]) => [0x2109],
        enc_add_ri: (Opc::ADD_RI, [1, 0x00FF]) => [0x010C, 0x00FF],
        enc_shl: (Opc::SHL_RI, [4, 3]) => [0x3415],
        enc_not: (Opc::NOT_R, [0xF]) => [0x0F18],
        enc_push_reg: (Opc::PUSH_REG, [2]) => [0x022A],
        enc_pop_far: (Opc::POP_FAR, [0x0002_0000]) => [0x002C, 0x0002, 0x0000],
        enc_imov_st_imm: (Opc::IMOV_ST_IMM, [0x0001_0200, 0x00AB]) =>
            [0x004C, 0x00AB, 0x0001, 0x0200],
        enc_brchf_far: (Opc::BRCH_FLG_FAR, [0x0001_0010, 0x3]) => [0x3042, 0x0001, 0x0010],
        enc_brchf_near: (Opc::BRCH_FLG_NEAR, [0x0010, 0x3]) => [0x3042, 0x0010],
        enc_brchi_far: (Opc::BRCH_IV_FAR, [0x0001_0010, 0x7F]) => [0x7F46, 0x0001, 0x0010],
        enc_brchi_near: (Opc::BRCH_IV_NEAR, [0x0010, 0x7F]) => [0x7F46, 0x0010],
        enc_emov: (Opc::MOV_RSA, [0xA, 0x3]) => [0xA34F],
        enc_pair_load: (Opc::MOV_PR_LD, [2, 6]) => [0x6250],
        enc_pair_store: (Opc::MOV_PR_ST, [6, 2]) => [0x6251],
        enc_dw: (Opc::DW, [0xCAFE]) => [0xCAFE],
    }

    #[test]
    fn register_fields_are_masked() {
        // out-of-range operand values never bleed into other fields
        assert_eq!(encode(Opc::MOV_R2R, [0x13, 0x27, 0, 0]).words, vec![0x7307]);
    }

    #[test]
    fn byte_len_counts_words() {
        assert_eq!(encode(Opc::JMP_FAR, [0, 0, 0, 0]).byte_len(), 6);
        assert_eq!(AssembledInsn::empty().byte_len(), 0);
    }

    #[test]
    #[should_panic(expected = "not in the catalog")]
    fn unknown_opcode_panics() {
        encode(0xFFFF, [0, 0, 0, 0]);
    }
}
