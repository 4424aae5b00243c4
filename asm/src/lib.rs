pub mod assembler;
pub mod error;
pub mod label;
pub mod output;
pub mod parser;
pub mod preprocess;

pub use assembler::{assemble, assemble_named, CodeByte};
pub use error::{Diag, Error};
pub use preprocess::{Preprocessor, SourceLine};
