use serde::{Deserialize, Serialize};
use std::fmt;

/// Register designator `r0`..`r15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reg(u8);

impl Reg {
    pub const MAX: u8 = 15;

    pub fn new(num: u8) -> Option<Self> {
        (num <= Self::MAX).then_some(Reg(num))
    }

    /// Accepts `r`/`R` followed by decimal digits, returning the digit part.
    /// The numeric range is the caller's business via [`Reg::new`]; this
    /// only checks the shape, so `r16` passes here and fails the range check.
    pub fn digits(s: &str) -> Option<&str> {
        s.strip_prefix(['r', 'R'])
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        let digits = Self::digits(s).ok_or(format!("Unknown reg name: {s}"))?;
        let num = digits
            .parse::<u8>()
            .map_err(|_| format!("Register value out of range: {s}"))?;
        Self::new(num).ok_or(format!("Register value out of range: {num}"))
    }

    pub fn num(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("r0"), Ok(Reg(0)));
    assert_eq!(Reg::parse("R15"), Ok(Reg(15)));
    assert!(Reg::parse("r16").is_err());
    assert!(Reg::parse("rx").is_err());
    assert!(Reg::parse("15").is_err());
}
