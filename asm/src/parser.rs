use crate::error::Error;
use arch::{Arch, ArgType, Cond, Mnemonic, Reg};

/// One parsed line: optional label definition plus optional instruction.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub label: Option<String>,
    pub code: Option<Code>,
}

#[derive(Debug, Clone)]
pub struct Code {
    pub mnemonic: Mnemonic,
    pub base: u8,
    pub operand: Operand,
}

#[derive(Debug, Clone)]
pub enum Operand {
    None,
    Reg(Reg),
    Imm(u8),
    /// Deferred `#label:slice` reference; the low nibble is patched in
    /// the resolution sweep.
    SliceRef(String, u8),
    Cond(Cond),
}

impl Stmt {
    pub fn parse(text: &str, arch: Arch) -> Result<Stmt, Error> {
        let mut words: Vec<&str> = text.split_whitespace().collect();

        let mut label = None;
        if let Some(first) = words.first() {
            if let Some(name) = first.strip_suffix(':') {
                if is_ident(name) {
                    label = Some(name.to_string());
                    words.remove(0);
                }
            }
        }

        let Some(&op) = words.first() else {
            return Ok(Stmt { label, code: None });
        };

        // The mnemonic must exist in the selected architecture's table.
        let (mnemonic, base) = Mnemonic::parse(op)
            .ok()
            .and_then(|m| Some((m, arch.base_opcode(m)?)))
            .ok_or_else(|| Error::UnknownInstruction(op.to_string()))?;

        let args = &words[1..];
        let operand = match mnemonic.arg_type() {
            ArgType::Inherent => {
                if !args.is_empty() {
                    return Err(count_mismatch(op, 0, args.len()));
                }
                Operand::None
            }
            ArgType::Register => {
                if args.len() != 1 {
                    return Err(count_mismatch(op, 1, args.len()));
                }
                Operand::Reg(parse_reg(args[0])?)
            }
            ArgType::Immediate => {
                if args.len() != 1 {
                    return Err(count_mismatch(op, 1, args.len()));
                }
                parse_imm(args[0])?
            }
            ArgType::Jump => match args {
                [] => Operand::Cond(Cond::AL),
                [cond] => Operand::Cond(Cond::parse(cond).map_err(|_| {
                    Error::InvalidOperandFormat(cond.to_string(), "jump condition".to_string())
                })?),
                _ => return Err(count_mismatch(op, 1, args.len())),
            },
        };

        Ok(Stmt {
            label,
            code: Some(Code {
                mnemonic,
                base,
                operand,
            }),
        })
    }
}

impl Code {
    /// Base opcode OR'd with the operand nibble. A slice reference emits
    /// the bare base; its nibble arrives in the resolution sweep.
    pub fn encode(&self) -> u8 {
        match &self.operand {
            Operand::None => self.base,
            Operand::Reg(reg) => self.base | reg.num(),
            Operand::Imm(val) => self.base | val,
            Operand::SliceRef(_, _) => self.base,
            Operand::Cond(cond) => self.base | u8::from(*cond),
        }
    }
}

fn count_mismatch(op: &str, expected: usize, found: usize) -> Error {
    Error::OperandCountMismatch {
        op: op.to_string(),
        expected,
        found,
    }
}

fn parse_reg(token: &str) -> Result<Reg, Error> {
    let digits = Reg::digits(token).ok_or_else(|| {
        Error::InvalidOperandFormat(token.to_string(), "register".to_string())
    })?;
    digits
        .parse::<u8>()
        .ok()
        .and_then(Reg::new)
        .ok_or_else(|| Error::OperandOutOfRange(token.to_string()))
}

fn parse_imm(token: &str) -> Result<Operand, Error> {
    let invalid =
        || Error::InvalidOperandFormat(token.to_string(), "immediate".to_string());

    let body = token.strip_prefix('#').ok_or_else(invalid)?;

    // `#label:slice` defers to the link state.
    if let Some((name, slice)) = body.split_once(':') {
        if !is_ident(name) {
            return Err(invalid());
        }
        let slice = slice.parse::<u8>().ok().filter(|s| *s <= 3).ok_or_else(invalid)?;
        return Ok(Operand::SliceRef(name.to_string(), slice));
    }

    let val = parse_with_prefix(body).ok_or_else(invalid)?;
    if val > 15 {
        return Err(Error::OperandOutOfRange(token.to_string()));
    }
    Ok(Operand::Imm(val as u8))
}

/// Non-negative literal in decimal, `0x` hex, or `0b` binary notation.
fn parse_with_prefix(s: &str) -> Option<u32> {
    if s.contains(['+', '-']) {
        return None;
    }
    if let Some(num) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(num, 16).ok()
    } else if let Some(num) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u32::from_str_radix(num, 2).ok()
    } else {
        u32::from_str_radix(s, 10).ok()
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
