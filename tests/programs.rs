use hack_asm::asm::encoding::{ObjFileFormat, TextFormat};
use hack_asm::asm::{assemble, assemble_debug, AsmFlags, Assembler, SymbolKind};
use hack_asm::file::assemble_stream;

const MAX_ASM: &str = include_str!("programs/Max.asm");
const MAX_HACK: &str = include_str!("programs/Max.hack");
const SUM_ASM: &str = include_str!("programs/Sum.asm");
const SUM_HACK: &str = include_str!("programs/Sum.hack");
const FILL_ASM: &str = include_str!("programs/Fill.asm");
const FILL_HACK: &str = include_str!("programs/Fill.hack");

const PROGRAMS: [(&str, &str, &str); 3] = [
    ("Max", MAX_ASM, MAX_HACK),
    ("Sum", SUM_ASM, SUM_HACK),
    ("Fill", FILL_ASM, FILL_HACK),
];

#[test]
fn test_programs() {
    for (name, asm, hack) in PROGRAMS {
        let out = assemble(asm).unwrap_or_else(|e| panic!("{name} failed to assemble: {e}"));
        assert_eq!(TextFormat::serialize(&out), hack, "{name}");
    }
}

#[test]
fn test_programs_strict() {
    let strict = AsmFlags { strict: true, ..Default::default() };
    for (name, asm, hack) in PROGRAMS {
        let out = Assembler::new(asm, strict).assemble()
            .unwrap_or_else(|e| panic!("{name} failed to assemble: {e}"));
        assert_eq!(TextFormat::serialize(&out), hack, "{name}");
    }
}

#[test]
fn test_programs_stream() {
    for (name, asm, hack) in PROGRAMS {
        let mut out = vec![];
        assemble_stream(asm.as_bytes(), &mut out, AsmFlags::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), hack, "{name}");
    }
}

#[test]
fn test_sum_symbols() {
    let out = assemble_debug(SUM_ASM).unwrap();
    let sym = out.symbol_table().unwrap();

    assert_eq!(sym.get("i"), Some(16));
    assert_eq!(sym.get("sum"), Some(17));
    assert_eq!(sym.kind("sum"), Some(SymbolKind::Variable));

    assert_eq!(sym.get("LOOP"), Some(4));
    assert_eq!(sym.get("STOP"), Some(18));
    assert_eq!(sym.get("END"), Some(22));
    assert_eq!(sym.kind("END"), Some(SymbolKind::Label));
}

#[test]
fn test_fill_symbols() {
    let out = assemble_debug(FILL_ASM).unwrap();
    let sym = out.symbol_table().unwrap();

    assert_eq!(sym.get("RESTART"), Some(0));
    assert_eq!(sym.get("KBDCHECK"), Some(4));
    // variables are numbered by first use in pass 2, not by declaration
    assert_eq!(sym.get("ptr"), Some(16));
    assert_eq!(sym.get("color"), Some(17));
}

#[test]
fn test_line_endings() {
    // Windows line endings and tabs assemble identically.
    let crlf = MAX_ASM.replace('\n', "\r\n").replace("    ", "\t");
    assert_eq!(assemble(&crlf).unwrap(), assemble(MAX_ASM).unwrap());
}
