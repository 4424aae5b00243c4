use crate::error::{Diag, Error};
use crate::label::{nibble, Labels, PendingRef};
use crate::parser::{Operand, Stmt};
use crate::preprocess::{Preprocessor, SourceLine};
use arch::Arch;

/// One output byte and the 1-based source line it came from. The index of
/// an entry in the output list is its byte address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeByte {
    pub byte: u8,
    pub line: usize,
}

/// Assemble a full source unit: preprocess, encode, then resolve pending
/// label references. All diagnostics are collected; any diagnostic makes
/// the run fail with no partial output.
pub fn assemble(source: &str, arch: Arch) -> Result<Vec<CodeByte>, Vec<Diag>> {
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let expanded = Preprocessor::run(&lines)?;
    assemble_lines(&expanded, arch)
}

/// Same as [`assemble`], with the architecture given by name. An unknown
/// name fails before any line is scanned.
pub fn assemble_named(source: &str, arch: &str) -> Result<Vec<CodeByte>, Vec<Diag>> {
    let arch = Arch::parse(arch).map_err(|_| {
        vec![Diag::new(0, Error::UnsupportedArchitecture(arch.to_string()))]
    })?;
    assemble(source, arch)
}

/// The two passes over an already-preprocessed line list.
pub fn assemble_lines(lines: &[SourceLine], arch: Arch) -> Result<Vec<CodeByte>, Vec<Diag>> {
    let mut code: Vec<CodeByte> = vec![];
    let mut labels = Labels::new();
    let mut pending: Vec<PendingRef> = vec![];
    let mut diags: Vec<Diag> = vec![];

    // Pass 1: encode instructions, record labels at the address the next
    // byte will occupy, defer slice references.
    for src in lines {
        if src.text.trim().is_empty() {
            continue;
        }
        let stmt = match Stmt::parse(&src.text, arch) {
            Ok(stmt) => stmt,
            Err(err) => {
                diags.push(Diag::new(src.line, err));
                continue;
            }
        };
        if let Some(name) = &stmt.label {
            if let Err(err) = labels.insert(name, src.line, code.len()) {
                diags.push(Diag::new(src.line, err));
            }
        }
        if let Some(op) = stmt.code {
            if let Operand::SliceRef(name, slice) = &op.operand {
                pending.push(PendingRef {
                    addr: code.len(),
                    name: name.clone(),
                    slice: *slice,
                    line: src.line,
                });
            }
            code.push(CodeByte {
                byte: op.encode(),
                line: src.line,
            });
        }
    }

    // Pass 2: every label is final now, so patch the deferred references.
    for refer in &pending {
        match labels.addr(&refer.name) {
            Some(addr) => code[refer.addr].byte |= nibble(addr, refer.slice),
            None => diags.push(Diag::new(
                refer.line,
                Error::UnresolvedLabel(refer.name.clone()),
            )),
        }
    }

    if diags.is_empty() {
        Ok(code)
    } else {
        Err(diags)
    }
}
