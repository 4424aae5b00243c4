use crate::error::Error;
use indexmap::IndexMap;

/// A defined label: its spelling, defining line, and byte address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDef {
    pub name: String,
    pub line: usize,
    pub addr: usize,
}

/// Label table. Names are case-insensitive, both for duplicate detection
/// and for lookup, matching mnemonic handling.
#[derive(Debug, Default)]
pub struct Labels {
    map: IndexMap<String, LabelDef>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, line: usize, addr: usize) -> Result<(), Error> {
        let key = name.to_ascii_lowercase();
        if self.map.contains_key(&key) {
            return Err(Error::DuplicateLabel(name.to_string()));
        }
        self.map.insert(
            key,
            LabelDef {
                name: name.to_string(),
                line,
                addr,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LabelDef> {
        self.map.get(&name.to_ascii_lowercase())
    }

    pub fn addr(&self, name: &str) -> Option<usize> {
        self.get(name).map(|def| def.addr)
    }
}

/// A recorded intent to patch the byte at `addr` with a nibble of a label's
/// address once the full unit has been scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRef {
    pub addr: usize,
    pub name: String,
    pub slice: u8,
    pub line: usize,
}

/// Extract the 4-bit slice `[4*slice+3 : 4*slice]` of an address.
pub fn nibble(addr: usize, slice: u8) -> u8 {
    ((addr >> (4 * slice as usize)) & 0xF) as u8
}
