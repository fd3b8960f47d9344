use std::io::Write;

use arch::AssembledInsn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Binary,
    Logisim,
}

/// Flat stream of big-endian words in emission order.
pub fn write_binary<W: Write>(out: &mut W, insns: &[AssembledInsn]) -> std::io::Result<()> {
    for insn in insns {
        for word in &insn.words {
            out.write_all(&word.to_be_bytes())?;
        }
    }
    Ok(())
}

/// Logisim memory image: one line per instruction, each line carrying the
/// running word address and that instruction's words.
pub fn write_logisim<W: Write>(out: &mut W, insns: &[AssembledInsn]) -> std::io::Result<()> {
    writeln!(out, "v3.0 hex words addressed")?;
    let mut addr: u32 = 0;
    for insn in insns {
        let words: Vec<String> = insn.words.iter().map(|w| format!("{:04x}", w)).collect();
        writeln!(out, "{:08X}: {}", addr, words.join(" "))?;
        addr += insn.words.len() as u32;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insn(words: &[u16]) -> AssembledInsn {
        AssembledInsn { words: words.to_vec() }
    }

    #[test]
    fn binary_is_big_endian() {
        let mut buf = Vec::new();
        write_binary(&mut buf, &[insn(&[0x0036, 0x1234])]).unwrap();
        assert_eq!(buf, vec![0x00, 0x36, 0x12, 0x34]);
    }

    #[test]
    fn logisim_addresses_count_words() {
        let mut buf = Vec::new();
        write_logisim(&mut buf, &[insn(&[0x0036, 0x1234]), insn(&[0x0000])]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "v3.0 hex words addressed\n00000000: 0036 1234\n00000002: 0000\n"
        );
    }
}
