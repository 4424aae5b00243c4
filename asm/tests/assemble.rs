use arch::Arch;
use hcxasm::{assemble, assemble_named, CodeByte, Error};

fn bytes(source: &str, arch: Arch) -> Vec<u8> {
    assemble(source, arch)
        .unwrap()
        .iter()
        .map(|c| c.byte)
        .collect()
}

#[test]
fn hc4_example_program() {
    let src = "SM\nSC r10\nSU r15\nLI #5\nJP NC\nJP";
    assert_eq!(
        bytes(src, Arch::HC4),
        vec![0x00, 0x1A, 0x2F, 0xA5, 0xE3, 0xE0]
    );
}

#[test]
fn forward_reference_program() {
    let src = "NP\nLOOP: SM\nSC r12\nSU r0\nLI #LOOP:0\nLI #LOOP:1\nJP Z\nJP";
    assert_eq!(
        bytes(src, Arch::HC4),
        vec![0xE1, 0x00, 0x1C, 0x20, 0xA1, 0xA0, 0xE4, 0xE0]
    );
}

#[test]
fn forward_and_backward_references_agree() {
    // `spot` sits at address 2 in both programs.
    let fwd = bytes("LI #spot:0\nSM\nspot: NP", Arch::HC4);
    let bwd = bytes("SM\nSM\nspot: NP\nLI #spot:0", Arch::HC4);
    assert_eq!(fwd[0], 0xA2);
    assert_eq!(bwd[3], 0xA2);
}

#[test]
fn provenance_lines_are_1_based_source_lines() {
    let src = "SM\n\nSC r1 ; comment\nskip: \nJP";
    let code = assemble(src, Arch::HC4).unwrap();
    assert_eq!(
        code,
        vec![
            CodeByte { byte: 0x00, line: 1 },
            CodeByte { byte: 0x11, line: 3 },
            CodeByte { byte: 0xE0, line: 5 },
        ]
    );
}

#[test]
fn label_addresses_skip_non_emitting_lines() {
    // Labels, blanks and comments consume no address.
    let src = "a: ; nothing yet\n\nb: SM\nc:\nd: SM\nLI #d:0";
    let code = bytes(src, Arch::HC4);
    // a=b=0, c=d=1; the reference picks up d=1.
    assert_eq!(code, vec![0x00, 0x00, 0xA1]);
}

#[test]
fn out_of_range_operands_fail() {
    let diags = assemble("SC r16", Arch::HC4).unwrap_err();
    assert!(matches!(diags[0].error, Error::OperandOutOfRange(_)));

    let diags = assemble("LI #16", Arch::HC4).unwrap_err();
    assert!(matches!(diags[0].error, Error::OperandOutOfRange(_)));
}

#[test]
fn unknown_mnemonic_fails() {
    let diags = assemble("XX r1", Arch::HC4).unwrap_err();
    assert_eq!(diags[0].error, Error::UnknownInstruction("XX".to_string()));
    assert_eq!(diags[0].line, 1);
}

#[test]
fn duplicate_label_fails_either_way_around() {
    let diags = assemble("x: SM\nx: NP", Arch::HC4).unwrap_err();
    assert!(matches!(diags[0].error, Error::DuplicateLabel(_)));
    assert_eq!(diags[0].line, 2);

    // Case-insensitive duplicate, with valid code in between.
    let diags = assemble("x: SM\nJP\nX: NP", Arch::HC4).unwrap_err();
    assert!(matches!(diags[0].error, Error::DuplicateLabel(_)));
}

#[test]
fn unresolved_label_reported_after_full_scan() {
    let diags = assemble("LI #nowhere:0\nSM", Arch::HC4).unwrap_err();
    assert_eq!(
        diags[0].error,
        Error::UnresolvedLabel("nowhere".to_string())
    );
    assert_eq!(diags[0].line, 1);
}

#[test]
fn multiple_errors_are_collected() {
    let diags = assemble("XX\nSC r16\nLI #gone:0", Arch::HC4).unwrap_err();
    assert_eq!(diags.len(), 3);
    assert_eq!(diags[0].line, 1);
    assert_eq!(diags[1].line, 2);
    assert_eq!(diags[2].line, 3);
}

#[test]
fn hc4e_rejects_hc4_only_mnemonics() {
    let diags = assemble("SM", Arch::HC4E).unwrap_err();
    assert!(matches!(diags[0].error, Error::UnknownInstruction(_)));

    assert_eq!(bytes("AD r2\nLI #3\nJP", Arch::HC4E), vec![0x32, 0xA3, 0xE0]);
}

#[test]
fn unsupported_architecture_fails_before_scanning() {
    let diags = assemble_named("SM", "HC8").unwrap_err();
    assert_eq!(
        diags[0].error,
        Error::UnsupportedArchitecture("HC8".to_string())
    );
    assert_eq!(diags[0].line, 0);

    // Selector parsing is case-insensitive.
    assert!(assemble_named("SM", "hc4").is_ok());
}

#[test]
fn macros_and_defines_assemble_end_to_end() {
    let src = "\
.define ACC r10
.macro STEP reg imm
SC reg
LI imm
.endmacro
start: STEP ACC #5
JP";
    let code = assemble(src, Arch::HC4).unwrap();
    let raw: Vec<u8> = code.iter().map(|c| c.byte).collect();
    assert_eq!(raw, vec![0x1A, 0xA5, 0xE0]);
    // Spliced lines report the invoking line.
    assert_eq!(code[0].line, 6);
    assert_eq!(code[1].line, 6);
}

#[test]
fn label_on_macro_invocation_binds_to_first_expanded_byte() {
    let src = "\
.macro PAIR
SM
JP
.endmacro
NP
loop: PAIR
LI #loop:0";
    // loop sits at address 1, where the expansion starts.
    assert_eq!(bytes(src, Arch::HC4), vec![0xE1, 0x00, 0xE0, 0xA1]);
}

#[test]
fn macro_body_slice_refs_resolve_against_final_labels() {
    let src = "\
.macro JUMPTO name
LI #name:0
.endmacro
NP
JUMPTO end
end: JP";
    // end sits at address 2.
    assert_eq!(bytes(src, Arch::HC4), vec![0xE1, 0xA2, 0xE0]);
}

#[test]
fn deterministic_output() {
    let src = "SM\nloop: SC r1\nLI #loop:0\nJP NZ";
    let a = assemble(src, Arch::HC4).unwrap();
    let b = assemble(src, Arch::HC4).unwrap();
    assert_eq!(a, b);
}
