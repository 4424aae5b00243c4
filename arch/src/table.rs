use crate::cond::Cond;
use crate::op::{ArgType, Mnemonic};

use bimap::BiMap;
use color_print::cformat;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Architecture selector. HC4 carries the full opcode set, HC4E the
/// reduced one; both share the same encodings for the ops they have.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Arch {
    HC4,
    HC4E,
}

macro_rules! opcode_table {
    ($($op:ident => $bin:expr,)*) => {{
        let mut table = BiMap::new();
        $(table.insert(Mnemonic::$op, $bin);)*
        table
    }};
}

static HC4_TABLE: Lazy<BiMap<Mnemonic, u8>> = Lazy::new(|| {
    opcode_table! {
        SM => 0b0000_0000,
        SC => 0b0001_0000,
        SU => 0b0010_0000,
        AD => 0b0011_0000,
        XR => 0b0100_0000,
        OR => 0b0101_0000,
        AN => 0b0110_0000,
        SA => 0b0111_0000,
        LM => 0b1000_0000,
        LD => 0b1001_0000,
        LI => 0b1010_0000,
        JP => 0b1110_0000,
        NP => 0b1110_0001,
    }
});

static HC4E_TABLE: Lazy<BiMap<Mnemonic, u8>> = Lazy::new(|| {
    opcode_table! {
        AD => 0b0011_0000,
        XR => 0b0100_0000,
        SA => 0b0111_0000,
        LD => 0b1001_0000,
        LI => 0b1010_0000,
        JP => 0b1110_0000,
        NP => 0b1110_0001,
    }
});

impl Arch {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unsupported architecture: {s}")),
        }
    }

    pub fn table(&self) -> &'static BiMap<Mnemonic, u8> {
        match self {
            Arch::HC4 => &HC4_TABLE,
            Arch::HC4E => &HC4E_TABLE,
        }
    }

    /// Base opcode of a mnemonic, or None if this architecture lacks it.
    pub fn base_opcode(&self, op: Mnemonic) -> Option<u8> {
        self.table().get_by_left(&op).copied()
    }

    /// Decode one byte back to (mnemonic, low nibble). Exact-byte entries
    /// (NP lives inside JP's operand space) win over the masked lookup.
    pub fn decode(&self, byte: u8) -> Option<(Mnemonic, u8)> {
        if let Some(&op) = self.table().get_by_right(&byte) {
            if op.arg_type() == ArgType::Inherent {
                return Some((op, 0));
            }
        }
        let op = *self.table().get_by_right(&(byte & 0xF0))?;
        Some((op, byte & 0x0F))
    }

    /// One-line colorized disassembly for listings.
    pub fn cformat(&self, byte: u8) -> String {
        match self.decode(byte) {
            Some((op, arg)) => match op.arg_type() {
                ArgType::Inherent => cformat!("<r>{:<3}</>", op),
                ArgType::Register => cformat!("<r>{:<3}</><b>r{}</>", op, arg),
                ArgType::Immediate => cformat!("<r>{:<3}</><y>#{}</>", op, arg),
                ArgType::Jump => cformat!("<r>{:<3}</><g>{}</>", op, Cond::from(arg)),
            },
            None => cformat!("<r,s>??</>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_base {
        ($($name:ident: $op:ident => $bin:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Arch::HC4.base_opcode(Mnemonic::$op), Some($bin));
                    let (op, arg) = Arch::HC4.decode($bin).unwrap();
                    assert_eq!(op, Mnemonic::$op);
                    assert_eq!(arg, 0);
                }
            )*
        };
    }

    test_base! {
        test_sm: SM => 0x00,
        test_sc: SC => 0x10,
        test_su: SU => 0x20,
        test_ad: AD => 0x30,
        test_xr: XR => 0x40,
        test_or: OR => 0x50,
        test_an: AN => 0x60,
        test_sa: SA => 0x70,
        test_lm: LM => 0x80,
        test_ld: LD => 0x90,
        test_li: LI => 0xA0,
        test_jp: JP => 0xE0,
    }

    #[test]
    fn test_np_exact() {
        assert_eq!(Arch::HC4.base_opcode(Mnemonic::NP), Some(0xE1));
        assert_eq!(Arch::HC4.decode(0xE1), Some((Mnemonic::NP, 0)));
        // Any other low nibble in the 0xE0 space is still a JP.
        assert_eq!(Arch::HC4.decode(0xE3), Some((Mnemonic::JP, 0x3)));
    }

    #[test]
    fn test_operand_roundtrip() {
        for arg in 0..=0xF {
            let byte = Arch::HC4.base_opcode(Mnemonic::SC).unwrap() | arg;
            assert_eq!(byte & 0xF0, 0x10);
            assert_eq!(Arch::HC4.decode(byte), Some((Mnemonic::SC, arg)));
        }
    }

    #[test]
    fn test_hc4e_subset() {
        assert_eq!(Arch::HC4E.base_opcode(Mnemonic::AD), Some(0x30));
        assert_eq!(Arch::HC4E.base_opcode(Mnemonic::SM), None);
        assert_eq!(Arch::HC4E.base_opcode(Mnemonic::OR), None);
        assert_eq!(Arch::HC4E.base_opcode(Mnemonic::LM), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Arch::parse("hc4"), Ok(Arch::HC4));
        assert_eq!(Arch::parse("HC4e"), Ok(Arch::HC4E));
        assert!(Arch::parse("HC8").is_err());
    }
}
