pub mod cond;
pub mod op;
pub mod reg;
pub mod table;

pub use cond::Cond;
pub use op::{ArgType, Mnemonic};
pub use reg::Reg;
pub use table::Arch;
