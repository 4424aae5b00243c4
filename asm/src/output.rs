use crate::assembler::CodeByte;
use arch::Arch;
use std::io::{self, Write};

/// Raw machine-code bytes.
pub fn write_binary<W: Write>(w: &mut W, code: &[CodeByte]) -> io::Result<()> {
    let bytes: Vec<u8> = code.iter().map(|c| c.byte).collect();
    w.write_all(&bytes)
}

/// One hex byte per line, for Verilog `$readmemh`.
pub fn write_vhex<W: Write>(w: &mut W, code: &[CodeByte]) -> io::Result<()> {
    for c in code {
        writeln!(w, "{:02X}", c.byte)?;
    }
    Ok(())
}

/// Intel HEX: 16-byte type-00 data records with the standard
/// two's-complement checksum, closed by the EOF record.
pub fn write_ihex<W: Write>(w: &mut W, code: &[CodeByte]) -> io::Result<()> {
    for (chunk_idx, chunk) in code.chunks(16).enumerate() {
        let address = chunk_idx * 16;
        let mut sum = chunk.len() as u32 + (address >> 8) as u32 + (address & 0xFF) as u32;
        let mut record = format!(":{:02X}{:04X}00", chunk.len(), address);
        for c in chunk {
            record.push_str(&format!("{:02X}", c.byte));
            sum += c.byte as u32;
        }
        let checksum = (!sum).wrapping_add(1) & 0xFF;
        writeln!(w, "{record}{checksum:02X}")?;
    }
    writeln!(w, ":00000001FF")
}

/// Annotated listing: address / opcode / originating source line, plus a
/// closing hex dump.
pub fn write_text<W: Write>(w: &mut W, code: &[CodeByte], source: &[String]) -> io::Result<()> {
    writeln!(w, "address  code  source")?;
    writeln!(w, "{}", "-".repeat(50))?;
    for (addr, c) in code.iter().enumerate() {
        let line = source.get(c.line - 1).map(|s| s.trim()).unwrap_or("");
        writeln!(w, "{:04X}     {:02X}    {}", addr, c.byte, line)?;
    }
    writeln!(w, "{}", "-".repeat(50))?;
    writeln!(w, "{} byte(s) generated", code.len())?;
    writeln!(w)?;
    writeln!(w, "hex dump:")?;
    for (chunk_idx, chunk) in code.chunks(16).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|c| format!("{:02X}", c.byte)).collect();
        writeln!(w, "{:04X}: {}", chunk_idx * 16, bytes.join(" "))?;
    }
    Ok(())
}

/// Colorized stdout listing with a one-line disassembly per byte.
pub fn print_dump(code: &[CodeByte], source: &[String], arch: Arch) {
    for (addr, c) in code.iter().enumerate() {
        let line = source.get(c.line - 1).map(|s| s.trim()).unwrap_or("");
        println!(
            "[{:04X}] {:02X} | {:>4}: {:<24} {}",
            addr,
            c.byte,
            c.line,
            arch.cformat(c.byte),
            line
        );
    }
    println!("{}", "-".repeat(60));
}
