use once_cell::sync::Lazy;
use regex::Regex;

use arch::{encode, select, AssembledInsn, Operand, OperandKind};

use crate::error::Error;
use crate::label::Context;

// ----------------------------------------------------------------------------
// Integer literals

/// Parse a bare integer literal: all-decimal, `0x` hex, or `0b` binary.
/// `None` means "not a literal", which callers use to fall through to label
/// interpretation; it is not an error by itself.
pub fn parse_int(token: &str) -> Option<u64> {
    if let Some(hex) = token.strip_prefix("0x") {
        if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u64::from_str_radix(hex, 16).ok();
        }
        return None;
    }
    if let Some(bin) = token.strip_prefix("0b") {
        if !bin.is_empty() && bin.bytes().all(|b| matches!(b, b'0' | b'1')) {
            return u64::from_str_radix(bin, 2).ok();
        }
        return None;
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok();
    }
    None
}

// ----------------------------------------------------------------------------
// Operands

static RE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^r(1[0-5]|[0-9]):r(1[0-5]|[0-9])$").unwrap());

/// Classify one token into a typed operand. A trailing comma is cosmetic and
/// stripped first. Textual cues are tried in a fixed order; the first match
/// decides the kind, and a malformed body under that cue is fatal rather than
/// falling through to a later interpretation.
pub fn parse_operand(token: &str, ctx: &Context) -> Result<Operand, Error> {
    let token = token.strip_suffix(',').unwrap_or(token);

    // +N / -N: displacement relative to the next instruction's start, so the
    // one-word jump being skipped is folded out of the stored value. The
    // stored value must fit the encoding's 8-bit displacement field.
    if let Some(body) = token.strip_prefix('+') {
        let v = parse_int(body).ok_or_else(|| Error::BadLiteral(token.to_string()))?;
        if v < 2 || v - 2 > 0xFF {
            return Err(Error::BadRelative(token.to_string()));
        }
        return Ok(Operand::new(OperandKind::RelFwd, (v - 2) as u32));
    }
    if let Some(body) = token.strip_prefix('-') {
        let v = parse_int(body).ok_or_else(|| Error::BadLiteral(token.to_string()))?;
        if v + 2 > 0xFF {
            return Err(Error::BadRelative(token.to_string()));
        }
        return Ok(Operand::new(OperandKind::RelBwd, (v + 2) as u32));
    }

    // [addr] or [rX:rX+1]
    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        if let Some(caps) = RE_PAIR.captures(inner) {
            let x: u32 = caps[1].parse().map_err(|_| Error::BadRegisterPair(token.to_string()))?;
            let y: u32 = caps[2].parse().map_err(|_| Error::BadRegisterPair(token.to_string()))?;
            if y != x + 1 {
                return Err(Error::BadRegisterPair(token.to_string()));
            }
            return Ok(Operand::new(OperandKind::RegPairPtr, x));
        }
        let value = match parse_int(inner) {
            Some(v) if v <= 0xFFFF_FFFF => v as u32,
            _ => ctx.lookup(inner)?,
        };
        return Ok(Operand::new(OperandKind::FarPtr, value));
    }

    // (addr)
    if let Some(inner) = token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        let value = match parse_int(inner) {
            Some(v) if v <= 0xFFFF => v as u32,
            _ => ctx.lookup(inner)? & 0xFFFF,
        };
        return Ok(Operand::new(OperandKind::NearPtr, value));
    }

    // rN
    if let Some(body) = token.strip_prefix('r') {
        let v = parse_int(body)
            .filter(|&v| v <= 0xF)
            .ok_or_else(|| Error::BadRegister(token.to_string()))?;
        return Ok(Operand::new(OperandKind::Register, v as u32));
    }

    // dN
    if let Some(body) = token.strip_prefix('d') {
        let v = parse_int(body)
            .filter(|&v| v <= 0xFFFF_FFFF)
            .ok_or_else(|| Error::BadDword(token.to_string()))?;
        return Ok(Operand::new(OperandKind::DwordImm, v as u32));
    }

    // 'c'
    let bytes = token.as_bytes();
    if bytes.len() == 3 && bytes[0] == b'\'' && bytes[2] == b'\'' {
        return Ok(Operand::new(OperandKind::CharLit, bytes[1] as u32));
    }

    // bare literal, @label (word), or label (dword address)
    if let Some(v) = parse_int(token) {
        if v <= 0xFFFF {
            return Ok(Operand::new(OperandKind::WordImm, v as u32));
        }
        if v <= 0xFFFF_FFFF {
            return Ok(Operand::new(OperandKind::DwordImm, v as u32));
        }
        return Err(Error::BadLiteral(token.to_string()));
    }
    if let Some(name) = token.strip_prefix('@') {
        return Ok(Operand::new(OperandKind::WordImm, ctx.lookup(name)? & 0xFFFF));
    }
    Ok(Operand::new(OperandKind::DwordImm, ctx.lookup(token)?))
}

// ----------------------------------------------------------------------------
// Line assembly

static RE_DS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)^ds\s+"([ !#-~]+)("|$)"#).unwrap());

/// Assemble one prepared source line (no label, directive, or comment lines).
/// Returns an empty instruction for a blank line.
pub fn parse_and_encode(line: &str, ctx: &Context) -> Result<AssembledInsn, Error> {
    // `ds "text"` is matched against the whole line before tokenization, one
    // word per character. The mnemonic case-folds like any other.
    if line.get(..3).is_some_and(|head| head.eq_ignore_ascii_case("ds ")) {
        let caps = RE_DS.captures(line).ok_or(Error::BadString)?;
        let text = &caps[1];
        if text.len() > 64 {
            return Err(Error::StringTooLong(text.len()));
        }
        return Ok(AssembledInsn { words: text.bytes().map(u16::from).collect() });
    }

    let mut tokens = line.split_whitespace();
    let mnemonic = match tokens.next() {
        Some(head) => head.to_ascii_lowercase(),
        None => return Ok(AssembledInsn::empty()),
    };

    let mut sig = String::new();
    let mut kinds = Vec::new();
    let mut p = [0u32; 4];
    for (i, token) in tokens.enumerate() {
        let operand = parse_operand(token, ctx)?;
        sig.push(operand.kind.tag());
        kinds.push(operand.kind);
        if i < p.len() {
            p[i] = operand.value;
        }
    }

    let def = select(&mnemonic, &sig).ok_or_else(|| Error::NoMatch {
        mnemonic,
        operands: kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", "),
    })?;
    Ok(encode(def.opcode, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Stage;

    fn ctx() -> Context {
        let mut ctx = Context::new(1);
        ctx.labels.insert("entry", 0x0001_0040).unwrap();
        ctx.stage = Stage::Emit;
        ctx
    }

    #[test]
    fn int_literals() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("255"), Some(255));
        assert_eq!(parse_int("0x1F"), Some(0x1F));
        assert_eq!(parse_int("0b1010"), Some(0b1010));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("12a"), None);
        assert_eq!(parse_int("0x"), None);
        assert_eq!(parse_int("0xG1"), None);
        assert_eq!(parse_int("0b102"), None);
        assert_eq!(parse_int("label"), None);
    }

    macro_rules! test_operand {
        ($($name:ident: $token:expr => ($kind:ident, $value:expr),)*) => {
            $(
                #[test]
                fn $name() {
                    let op = parse_operand($token, &ctx()).unwrap();
                    assert_eq!(op.kind, OperandKind::$kind);
                    assert_eq!(op.value, $value);
                }
            )*
        }
    }

    test_operand! {
        op_register: "r11" => (Register, 11),
        op_register_comma: "r3," => (Register, 3),
        op_word: "0x1234" => (WordImm, 0x1234),
        op_word_decimal: "65535" => (WordImm, 0xFFFF),
        op_dword_auto: "0x12345" => (DwordImm, 0x12345),
        op_dword_explicit: "d255" => (DwordImm, 255),
        op_near: "(0xF00D)" => (NearPtr, 0xF00D),
        op_near_label: "(entry)" => (NearPtr, 0x0040),
        op_far: "[0xDEAD1234]" => (FarPtr, 0xDEAD1234),
        op_far_label: "[entry]" => (FarPtr, 0x0001_0040),
        op_pair: "[r6:r7]" => (RegPairPtr, 6),
        op_pair_high: "[r14:r15]" => (RegPairPtr, 14),
        op_rel_fwd: "+4" => (RelFwd, 2),
        op_rel_fwd_max: "+257" => (RelFwd, 0xFF),
        op_rel_bwd: "-2" => (RelBwd, 4),
        op_rel_bwd_max: "-253" => (RelBwd, 0xFF),
        op_char: "'A'" => (CharLit, 0x41),
        op_label_word: "@entry" => (WordImm, 0x0040),
        op_label_dword: "entry" => (DwordImm, 0x0001_0040),
    }

    #[test]
    fn bad_operands() {
        let ctx = ctx();
        assert!(matches!(parse_operand("r16", &ctx), Err(Error::BadRegister(_))));
        assert!(matches!(parse_operand("rx", &ctx), Err(Error::BadRegister(_))));
        assert!(matches!(parse_operand("dzzz", &ctx), Err(Error::BadDword(_))));
        assert!(matches!(parse_operand("[r6:r9]", &ctx), Err(Error::BadRegisterPair(_))));
        assert!(matches!(parse_operand("+1", &ctx), Err(Error::BadRelative(_))));
        assert!(matches!(parse_operand("+300", &ctx), Err(Error::BadRelative(_))));
        assert!(matches!(parse_operand("-254", &ctx), Err(Error::BadRelative(_))));
        assert!(matches!(parse_operand("-70000", &ctx), Err(Error::BadRelative(_))));
        assert!(matches!(parse_operand("nowhere", &ctx), Err(Error::UndefinedLabel(_))));
    }

    #[test]
    fn unresolved_label_in_layout_stage_is_zero() {
        let mut ctx = ctx();
        ctx.stage = Stage::Layout;
        let op = parse_operand("nowhere", &ctx).unwrap();
        assert_eq!((op.kind, op.value), (OperandKind::DwordImm, 0));
    }

    #[test]
    fn line_mova() {
        let asi = parse_and_encode("mova 0x1234", &ctx()).unwrap();
        assert_eq!(asi.words, vec![0x0036, 0x1234]);
    }

    #[test]
    fn line_mov_register_pair() {
        let asi = parse_and_encode("mov r2 [r6:r7]", &ctx()).unwrap();
        assert_eq!(asi.words, vec![0x6250]);
    }

    #[test]
    fn line_ds() {
        let asi = parse_and_encode("ds \"HI\"", &ctx()).unwrap();
        assert_eq!(asi.words, vec![0x0048, 0x0049]);
    }

    #[test]
    fn line_ds_too_long() {
        let line = format!("ds \"{}\"", "x".repeat(65));
        assert!(matches!(parse_and_encode(&line, &ctx()), Err(Error::StringTooLong(65))));
    }

    #[test]
    fn line_ds_unterminated_is_accepted() {
        // the closing quote is optional, matching the line-pattern grammar
        let asi = parse_and_encode("ds \"ok", &ctx()).unwrap();
        assert_eq!(asi.words, vec![0x006F, 0x006B]);
    }

    #[test]
    fn line_mnemonic_case_folds() {
        let asi = parse_and_encode("MOVA 0x1234", &ctx()).unwrap();
        assert_eq!(asi.words, vec![0x0036, 0x1234]);
    }

    #[test]
    fn line_ds_case_folds() {
        let asi = parse_and_encode("DS \"HI\"", &ctx()).unwrap();
        assert_eq!(asi.words, vec![0x0048, 0x0049]);
    }

    #[test]
    fn line_no_match() {
        let err = parse_and_encode("mov 0x12345", &ctx()).unwrap_err();
        match err {
            Error::NoMatch { mnemonic, operands } => {
                assert_eq!(mnemonic, "mov");
                assert_eq!(operands, "DwordImm");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
