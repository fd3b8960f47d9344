use arch::AssembledInsn;

use crate::error::{Error, Located};
use crate::label::{Context, Stage};
use crate::parser::{parse_and_encode, parse_int};

// ----------------------------------------------------------------------------
// Line shapes
//
// Lines are whitespace-normalized once, then every pass sees the same text.

fn prep(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_comment(line: &str) -> bool {
    line.starts_with(';')
}

fn is_label(line: &str) -> bool {
    line.ends_with(':')
}

fn origin(line: &str) -> Option<&str> {
    // get() instead of slicing: byte 5 may sit inside a multi-byte char
    let head = line.get(..5)?;
    if line.len() > 5 && head.eq_ignore_ascii_case("$org ") {
        Some(&line[5..])
    } else {
        None
    }
}

/// Anything that survives the cheaper shape checks and is long enough to hold
/// a mnemonic gets parsed as an instruction.
fn is_insn(line: &str) -> bool {
    !line.is_empty()
        && !is_comment(line)
        && !is_label(line)
        && origin(line).is_none()
        && line.len() > 2
}

// ----------------------------------------------------------------------------
// Pass orchestration

/// Assemble a full source text into the final instruction stream.
///
/// Three passes run in a fixed order. The counting pass sizes the label table.
/// The layout pass walks the address cursor over every line, recording label
/// addresses; instruction lines are encoded only to learn their lengths, with
/// unresolved labels standing in as 0, and the words are thrown away. The emit
/// pass re-encodes every instruction line with all labels known and keeps the
/// words. The split exists because a line's length can depend on operand
/// syntax that references a label defined further down.
pub fn assemble(source: &str) -> Result<Vec<AssembledInsn>, Located> {
    let lines: Vec<String> = source.lines().map(|l| prep(l)).collect();

    let nlabels = lines.iter().filter(|l| is_label(l)).count();
    let mut ctx = Context::new(nlabels);

    let mut cursor: u32 = 0;
    for (idx, line) in lines.iter().enumerate() {
        if line.is_empty() || is_comment(line) {
            continue;
        }
        if let Some(lit) = origin(line) {
            cursor = match parse_int(lit) {
                Some(v) => v as u32,
                None => return Err(Error::BadOrigin(lit.to_string()).at(idx, line)),
            };
            continue;
        }
        if is_label(line) {
            let name = &line[..line.len() - 1];
            ctx.labels.insert(name, cursor).map_err(|e| e.at(idx, line))?;
            continue;
        }
        if line.len() > 2 {
            let asi = parse_and_encode(line, &ctx).map_err(|e| e.at(idx, line))?;
            cursor += asi.byte_len();
        }
    }

    ctx.stage = Stage::Emit;
    let mut out = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if !is_insn(line) {
            continue;
        }
        let asi = parse_and_encode(line, &ctx).map_err(|e| e.at(idx, line))?;
        if !asi.words.is_empty() {
            out.push(asi);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_prep_collapses_spaces() {
        assert_eq!(prep("  mov   r1,\tr2  "), "mov r1, r2");
        assert_eq!(prep("   "), "");
    }

    #[test]
    fn origin_is_case_insensitive() {
        assert_eq!(origin("$ORG 0x100"), Some("0x100"));
        assert_eq!(origin("$org 16"), Some("16"));
        assert_eq!(origin("$org"), None);
        assert_eq!(origin("mov r1 r2"), None);
    }

    #[test]
    fn origin_check_survives_multibyte_chars() {
        // byte 5 falls inside the euro sign; must classify, not panic
        assert_eq!(origin("abcd€f:"), None);
        assert_eq!(origin("début: nop"), None);
    }

    #[test]
    fn layout_and_emit_lengths_agree() {
        let src = "jmp target\nmov r1 0x10\ntarget:\nnop\n";
        let insns = assemble(src).unwrap();
        let lens: Vec<usize> = insns.iter().map(|i| i.words.len()).collect();
        assert_eq!(lens, vec![3, 2, 1]);
    }
}
