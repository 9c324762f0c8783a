//! Assembling Hack assembly source into machine words.
//!
//! The assembler module notably consists of:
//! - [`assemble`] and [`assemble_debug`]: The main functions which assemble source into a [`HackFile`].
//! - [`Assembler`]: the two-pass assembler driving those functions, configurable with [`AsmFlags`].
//! - [`SymbolTable`]: a struct holding the symbol table, which maps symbols to addresses
//!     (predefined symbols, labels from the first pass, and variables from the second pass)
//! - [`HackFile`]: a struct holding the assembled program
//!
//! The [`mnemonic`] module holds the bit patterns of C-instructions, and the [`encoding`]
//! module holds the formats a [`HackFile`] can be written in.

pub mod encoding;
pub mod mnemonic;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Range;

use crate::ast::{CompInstr, Instr, Operand, ADDR_MAX};
use crate::err::ErrSpan;
use crate::parse::{LineCursor, ParseErr, ParseErrKind, SourceInfo};

/// The address of the first variable.
///
/// Addresses below this are reserved for `R0`-`R15`.
pub const VAR_START: u16 = 16;

/// Assembles Hack assembly source code into a [`HackFile`].
///
/// This function assembles the source *without* including the symbol table
/// in the output. See [`assemble_debug`] to keep it.
///
/// # Example
/// ```
/// use hack_asm::asm::assemble;
///
/// let src = "
///     @2
///     D=A
///     @3
///     D=D+A
///     @0
///     M=D
/// ";
/// let hack = assemble(src).unwrap();
/// assert_eq!(hack.words().len(), 6);
/// assert!(hack.symbol_table().is_none());
///
/// let lines: Vec<_> = hack.lines().collect();
/// assert_eq!(lines[0], "0000000000000010");
/// assert_eq!(lines[3], "1110000010010000");
/// ```
pub fn assemble(src: &str) -> Result<HackFile, AsmErr> {
    Assembler::new(src, AsmFlags::default()).assemble()
}
/// Assembles Hack assembly source code into a [`HackFile`].
///
/// This function assembles the source *and* includes the final symbol table
/// in the output.
///
/// # Example
/// ```
/// use hack_asm::asm::assemble_debug;
///
/// let src = "
///     (LOOP)
///     @i
///     M=M-1
///     @LOOP
///     0;JMP
/// ";
/// let hack = assemble_debug(src).unwrap();
/// assert_eq!(hack.words().len(), 4);
///
/// let sym = hack.symbol_table().unwrap();
/// assert_eq!(sym.get("LOOP"), Some(0));
/// assert_eq!(sym.get("i"), Some(16));
/// ```
pub fn assemble_debug(src: &str) -> Result<HackFile, AsmErr> {
    Assembler::new(src, AsmFlags { debug_symbols: true, ..Default::default() }).assemble()
}

/// Kinds of errors that can occur from assembling given assembly code.
///
/// See [`AsmErr`] for this error type with span information included.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum AsmErrKind {
    /// A line could not be classified.
    Parse(ParseErrKind),
    /// A symbol was bound to two different addresses (pass 1).
    SymbolConflict,
    /// An address given to the symbol table does not fit in 15 bits.
    AddrTooLarge,
    /// The program has more instructions than fit in instruction memory (pass 1).
    ProgramTooLarge,
    /// There are more variables than fit in data memory (pass 2).
    OutOfVariableMemory,
    /// The computation is not a known mnemonic (pass 2, strict only).
    UnknownComp,
    /// The destination is not a combination of `A`, `D`, and `M` (pass 2, strict only).
    InvalidDest,
    /// The jump is not a known mnemonic (pass 2, strict only).
    UnknownJump,
}
impl std::fmt::Display for AsmErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e)            => e.fmt(f),
            Self::SymbolConflict      => f.write_str("symbol was bound to multiple addresses"),
            Self::AddrTooLarge        => f.write_str("address does not fit 15 bits"),
            Self::ProgramTooLarge     => f.write_str("program does not fit in instruction memory"),
            Self::OutOfVariableMemory => f.write_str("too many variables"),
            Self::UnknownComp         => f.write_str("unknown computation"),
            Self::InvalidDest         => f.write_str("invalid destination"),
            Self::UnknownJump         => f.write_str("unknown jump"),
        }
    }
}

/// Error from assembling given assembly code.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AsmErr {
    /// The value with a span.
    pub kind: AsmErrKind,
    /// The span in the source associated with this value.
    pub span: ErrSpan
}
impl AsmErr {
    /// Creates a new [`AsmErr`].
    pub fn new<E: Into<ErrSpan>>(kind: AsmErrKind, span: E) -> Self {
        AsmErr { kind, span: span.into() }
    }
}
impl From<ParseErr> for AsmErr {
    fn from(value: ParseErr) -> Self {
        AsmErr { kind: AsmErrKind::Parse(value.kind), span: value.span }
    }
}
impl std::fmt::Display for AsmErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}
impl std::error::Error for AsmErr {}
impl crate::err::Error for AsmErr {
    fn span(&self) -> Option<ErrSpan> {
        Some(self.span.clone())
    }

    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match &self.kind {
            AsmErrKind::Parse(e)            => e.help(),
            AsmErrKind::SymbolConflict      => Some("labels must be unique and cannot rebind predefined symbols, try renaming the label".into()),
            AsmErrKind::AddrTooLarge        => Some(format!("the range for an address is [0, {ADDR_MAX}]").into()),
            AsmErrKind::ProgramTooLarge     => Some(format!("instruction memory holds at most {} instructions", usize::from(ADDR_MAX) + 1).into()),
            AsmErrKind::OutOfVariableMemory => Some(format!("variables are allocated from {VAR_START} to {ADDR_MAX}").into()),
            AsmErrKind::UnknownComp         => Some("computations are written in terms of 0, 1, D, A, and M (e.g., D+1, M-D, !A)".into()),
            AsmErrKind::InvalidDest         => Some("a destination names each of A, D, and M at most once (e.g., AM, MD)".into()),
            AsmErrKind::UnknownJump         => Some("the jumps are JGT, JEQ, JGE, JLT, JNE, JLE, and JMP".into()),
        }
    }
}

/// Configuration flags for [`Assembler`].
///
/// Read the field descriptions for more details.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AsmFlags {
    /// Whether strict mode is enabled.
    ///
    /// By default, the assembler accepts any line it can make sense of:
    /// a line that is not a label or an A-instruction is a C-instruction, and any
    /// unknown computation, destination, or jump encodes to zero bits.
    ///
    /// Strict mode rejects malformed lines and unknown mnemonics instead.
    ///
    /// By default, this flag is `false`.
    pub strict: bool,

    /// Whether to keep the symbol table in the assembled [`HackFile`].
    ///
    /// By default, this flag is `false`.
    pub debug_symbols: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for AsmFlags {
    fn default() -> Self {
        Self {
            strict: false,
            debug_symbols: false,
        }
    }
}

/// Where a symbol in the [`SymbolTable`] comes from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SymbolKind {
    /// A symbol built into the platform (`SP`, `R0`-`R15`, `SCREEN`, etc.).
    Predefined,
    /// A label declaration, bound to an instruction address.
    Label,
    /// A variable, bound to a data address on first use.
    Variable,
}

#[derive(PartialEq, Eq, Clone, Debug)]
struct SymbolData {
    addr: u16,
    kind: SymbolKind,
    /// Where the symbol was declared or first used (if it appears in source).
    span: Option<Range<usize>>,
}

const PREDEFINED: [(&str, u16); 23] = [
    ("SP",  0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("R0",  0), ("R1",  1), ("R2",  2), ("R3",  3),
    ("R4",  4), ("R5",  5), ("R6",  6), ("R7",  7),
    ("R8",  8), ("R9",  9), ("R10", 10), ("R11", 11),
    ("R12", 12), ("R13", 13), ("R14", 14), ("R15", 15),
    ("SCREEN", 0x4000),
    ("KBD", 0x6000),
];

/// A mapping from symbols to 15-bit addresses.
///
/// The table starts with the predefined symbols of the Hack platform:
///
/// | symbol         | address |
/// |----------------|---------|
/// | `SP`           | 0       |
/// | `LCL`          | 1       |
/// | `ARG`          | 2       |
/// | `THIS`         | 3       |
/// | `THAT`         | 4       |
/// | `R0`-`R15`     | 0-15    |
/// | `SCREEN`       | 16384   |
/// | `KBD`          | 24576   |
///
/// During assembly, labels are added in the first pass and variables in the second.
/// Once a symbol is bound, its address never changes.
/// Symbols are case-sensitive.
///
/// ## Example
/// ```
/// use hack_asm::asm::SymbolTable;
///
/// let mut sym = SymbolTable::new();
/// assert_eq!(sym.get("SCREEN"), Some(16384));
/// assert!(!sym.contains("LOOP"));
///
/// sym.add("LOOP", 4).unwrap();
/// assert_eq!(sym.get("LOOP"), Some(4));
///
/// // Rebinding to the same address is fine, rebinding elsewhere is not:
/// assert!(sym.add("LOOP", 4).is_ok());
/// assert!(sym.add("LOOP", 5).is_err());
/// assert!(sym.add("R1", 7).is_err());
/// ```
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SymbolTable {
    label_map: HashMap<String, SymbolData>,
}
impl SymbolTable {
    /// Creates a symbol table holding only the predefined symbols.
    pub fn new() -> Self {
        let label_map = PREDEFINED.iter()
            .map(|&(name, addr)| (name.to_string(), SymbolData { addr, kind: SymbolKind::Predefined, span: None }))
            .collect();

        Self { label_map }
    }

    /// Whether the symbol is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.label_map.contains_key(name)
    }

    /// Gets the address of a symbol (if it is bound).
    pub fn get(&self, name: &str) -> Option<u16> {
        self.label_map.get(name).map(|data| data.addr)
    }

    /// Gets where a symbol comes from (if it is bound).
    pub fn kind(&self, name: &str) -> Option<SymbolKind> {
        self.label_map.get(name).map(|data| data.kind)
    }

    /// Gets the source span where a symbol was declared (for labels) or first used (for variables).
    ///
    /// Predefined symbols and symbols added with [`SymbolTable::add`] have no source span.
    pub fn source_span(&self, name: &str) -> Option<Range<usize>> {
        self.label_map.get(name)?.span.clone()
    }

    /// Binds a label to an address.
    ///
    /// This fails if the symbol is already bound to a different address,
    /// or if the address does not fit in 15 bits.
    /// Binding a symbol to the address it already has does nothing.
    pub fn add(&mut self, name: &str, addr: u16) -> Result<(), AsmErr> {
        if addr > ADDR_MAX {
            return Err(AsmErr::new(AsmErrKind::AddrTooLarge, ErrSpan::Many(vec![])));
        }
        self.insert(name, SymbolData { addr, kind: SymbolKind::Label, span: None })
    }

    fn insert(&mut self, name: &str, data: SymbolData) -> Result<(), AsmErr> {
        match self.label_map.entry(name.to_string()) {
            // Two bindings with different addresses. Conflict.
            Entry::Occupied(e) if e.get().addr != data.addr => {
                let spans: Vec<_> = [e.get().span.clone(), data.span]
                    .into_iter()
                    .flatten()
                    .collect();
                Err(AsmErr::new(AsmErrKind::SymbolConflict, spans))
            },
            // Two bindings with the same address. No conflict.
            Entry::Occupied(_) => Ok(()),
            // New symbol.
            Entry::Vacant(e) => {
                e.insert(data);
                Ok(())
            }
        }
    }

    /// Gets an iterable of the mapping from symbols to addresses.
    pub fn iter(&self) -> impl Iterator<Item=(&str, u16, SymbolKind)> + '_ {
        self.label_map.iter()
            .map(|(name, data)| (&**name, data.addr, data.kind))
    }
}
impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The two-pass Hack assembler.
///
/// The assembler owns the source (through a [`LineCursor`]) and the [`SymbolTable`]:
/// 1. The first pass walks the source and binds each label to the address of
///     the instruction that follows it.
/// 2. The second pass walks the source again, binding new variables to addresses
///     from [`VAR_START`] upwards, and encodes every instruction.
///
/// The passes only run together, through [`Assembler::assemble`].
///
/// ## Example
/// ```
/// use hack_asm::asm::{Assembler, AsmFlags};
///
/// let strict = AsmFlags { strict: true, ..Default::default() };
/// assert!(Assembler::new("D=D+A", strict).assemble().is_ok());
/// assert!(Assembler::new("D=A+D", strict).assemble().is_err());
///
/// // permissive mode encodes unknown computations as zero bits:
/// let hack = Assembler::new("D=A+D", Default::default()).assemble().unwrap();
/// assert_eq!(hack.words(), [0b1110000000010000]);
/// ```
#[derive(Debug)]
pub struct Assembler {
    cursor: LineCursor,
    sym: SymbolTable,
    flags: AsmFlags,
}
impl Assembler {
    /// Creates an assembler over the given source.
    pub fn new(src: &str, flags: AsmFlags) -> Self {
        Self::from_source(SourceInfo::new(src), flags)
    }

    pub(crate) fn from_source(src: SourceInfo, flags: AsmFlags) -> Self {
        Self {
            cursor: LineCursor::from_source(src, flags.strict),
            sym: SymbolTable::new(),
            flags
        }
    }

    /// Runs both passes and produces the assembled program.
    pub fn assemble(mut self) -> Result<HackFile, AsmErr> {
        self.first_pass()?;
        let words = self.second_pass()?;

        Ok(HackFile {
            words,
            sym: self.flags.debug_symbols.then_some(self.sym),
        })
    }

    /// PASS 1: binds labels to instruction addresses.
    fn first_pass(&mut self) -> Result<(), AsmErr> {
        self.cursor.reset();

        // The address of the next instruction.
        let mut pc: u16 = 0;
        while self.cursor.has_more() {
            let stmt = self.cursor.advance()?;
            if pc > ADDR_MAX {
                return Err(AsmErr::new(AsmErrKind::ProgramTooLarge, stmt.span.clone()));
            }

            if let Instr::Label(name) = &stmt.nucleus {
                let data = SymbolData { addr: pc, kind: SymbolKind::Label, span: Some(stmt.span.clone()) };
                self.sym.insert(name, data)?;
            }
            if stmt.nucleus.is_executable() {
                pc += 1;
            }
        }

        Ok(())
    }

    /// PASS 2: binds variables and encodes instructions.
    fn second_pass(&mut self) -> Result<Vec<u16>, AsmErr> {
        self.cursor.reset();

        let mut next_var = VAR_START;
        let mut words = vec![];
        while self.cursor.has_more() {
            let stmt = self.cursor.advance()?;

            let word = match &stmt.nucleus {
                Instr::Label(_) => continue,
                Instr::Addr(Operand::Literal(n)) => *n,
                Instr::Addr(Operand::Symbol(name)) => match self.sym.get(name) {
                    Some(addr) => addr,
                    None => {
                        if next_var > ADDR_MAX {
                            return Err(AsmErr::new(AsmErrKind::OutOfVariableMemory, stmt.span.clone()));
                        }
                        let addr = next_var;
                        self.sym.insert(name, SymbolData { addr, kind: SymbolKind::Variable, span: Some(stmt.span.clone()) })?;
                        next_var += 1;
                        addr
                    }
                },
                Instr::Comp(instr) if self.flags.strict => {
                    encode_strict(instr).map_err(|kind| AsmErr::new(kind, stmt.span.clone()))?
                },
                Instr::Comp(instr) => instr.encode(),
            };
            words.push(word);
        }

        Ok(words)
    }
}

/// Encodes a C-instruction, failing on any unknown mnemonic.
fn encode_strict(instr: &CompInstr) -> Result<u16, AsmErrKind> {
    let comp = mnemonic::lookup_comp(&instr.comp)
        .ok_or(AsmErrKind::UnknownComp)?;
    let dest = match &instr.dest {
        Some(d) => mnemonic::lookup_dest(d).ok_or(AsmErrKind::InvalidDest)?,
        None => 0,
    };
    let jump = match &instr.jump {
        Some(j) => mnemonic::lookup_jump(j).ok_or(AsmErrKind::UnknownJump)?,
        None => 0,
    };

    Ok(mnemonic::pack(comp, dest, jump))
}

/// An assembled Hack program.
///
/// This is the final product after assembly source code is fully assembled:
/// one 16-bit word per instruction, in program order.
/// It can be written out with one of the formats in [`encoding`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HackFile {
    words: Vec<u16>,

    /// Debug symbols.
    sym: Option<SymbolTable>
}
impl HackFile {
    /// Creates a program from its machine words.
    pub fn new(words: Vec<u16>) -> Self {
        Self { words, sym: None }
    }

    /// The machine words of the program, in order.
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// The machine words of the program, as 16-character binary strings.
    pub fn lines(&self) -> impl Iterator<Item=String> + '_ {
        self.words.iter()
            .map(|w| format!("{w:016b}"))
    }

    /// Gets the symbol table if it is present in the program.
    pub fn symbol_table(&self) -> Option<&SymbolTable> {
        self.sym.as_ref()
    }
}
