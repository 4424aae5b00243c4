use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Jump condition flags. The code is the low nibble of the encoded `JP`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive)]
pub enum Cond {
    /// Unconditional jump: written with no operand at all.
    #[default]
    #[strum(serialize = "")]
    AL = 0b0000,
    N = 0b0001,
    C = 0b0010,
    NC = 0b0011,
    Z = 0b0100,
    NZ = 0b0101,
    T = 0b0110,
    NT = 0b0111,
}

impl Cond {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Invalid jump condition: {s}")),
        }
    }
}

#[test]
fn test() {
    assert_eq!(Cond::parse("nc"), Ok(Cond::NC));
    assert_eq!(Cond::parse("Z"), Ok(Cond::Z));
    assert_eq!(u8::from(Cond::NT), 0b0111);
    assert_eq!(Cond::from(0b0011u8), Cond::NC);
    assert!(Cond::parse("hoge").is_err());
}
