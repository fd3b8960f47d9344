pub mod encode;
pub mod insn;
pub mod operand;

pub use encode::{encode, AssembledInsn};
pub use insn::{select, InsnDef, CATALOG};
pub use operand::{Operand, OperandKind};
