use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Mnemonic {
    SM,
    SC,
    SU,
    AD,
    XR,
    OR,
    AN,
    SA,
    LM,
    LD,
    LI,
    JP,
    NP,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Inherent,
    Register,
    Immediate,
    Jump,
}

impl Mnemonic {
    pub fn arg_type(&self) -> ArgType {
        use Mnemonic::*;
        match self {
            SM | LM | NP => ArgType::Inherent,
            SC | SU | AD | XR | OR | AN | SA | LD => ArgType::Register,
            LI => ArgType::Immediate,
            JP => ArgType::Jump,
        }
    }
}

#[test]
fn test() {
    assert_eq!(Mnemonic::parse("li"), Ok(Mnemonic::LI));
    assert_eq!(Mnemonic::parse("Jp"), Ok(Mnemonic::JP));
    assert_eq!(Mnemonic::LI.arg_type(), ArgType::Immediate);
    assert_eq!(Mnemonic::SM.arg_type(), ArgType::Inherent);
    assert!(Mnemonic::parse("hoge").is_err());
}
