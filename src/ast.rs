//! Components relating to the classified statements of Hack assembly.
//!
//! Every executable source line is classified into an [`Instr`]:
//! - [`Instr::Addr`] (an A-instruction, e.g. `@21` or `@LOOP`),
//! - [`Instr::Label`] (a label declaration, e.g. `(LOOP)`),
//! - and [`Instr::Comp`] (a C-instruction, e.g. `D=D+A;JGT`).
//!
//! Statements carry raw mnemonic text. Encoding into machine words happens in
//! [`CompInstr::encode`] and in the [`asm`] module.
//!
//! [`asm`]: crate::asm

use std::ops::Range;

use crate::asm::mnemonic;

/// The largest address an A-instruction can hold (the top bit is the opcode).
pub const ADDR_MAX: u16 = 0x7FFF;

/// The operand of an A-instruction.
///
/// ## Examples
///
/// ```text
/// @21
///  ~~ Literal(21)
/// @LOOP
///  ~~~~ Symbol("LOOP")
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Operand {
    /// A decimal literal. Always between 0 and [`ADDR_MAX`].
    Literal(u16),
    /// A symbol, which is resolved against the symbol table.
    Symbol(String),
}
impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(n) => n.fmt(f),
            Operand::Symbol(s)  => f.write_str(s),
        }
    }
}

/// A C-instruction, in the form `dest=comp;jump`.
///
/// `dest` and `jump` are optional. All parts hold the raw mnemonic text
/// with whitespace removed.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct CompInstr {
    /// The destination mnemonic (e.g., `AM` in `AM=M-1`).
    pub dest: Option<String>,
    /// The computation mnemonic (e.g., `M-1` in `AM=M-1`).
    pub comp: String,
    /// The jump mnemonic (e.g., `JMP` in `0;JMP`).
    pub jump: Option<String>,
}
impl CompInstr {
    /// Creates a C-instruction from its parts.
    pub fn new(dest: Option<&str>, comp: &str, jump: Option<&str>) -> Self {
        Self {
            dest: dest.map(str::to_string),
            comp: comp.to_string(),
            jump: jump.map(str::to_string),
        }
    }

    /// Encodes this instruction into a machine word.
    ///
    /// The word is laid out as `111a cccc ccdd djjj`.
    /// Unknown mnemonics encode to zeroed fields.
    ///
    /// ## Example
    /// ```
    /// use hack_asm::ast::CompInstr;
    ///
    /// let instr = CompInstr::new(Some("D"), "D+A", None);
    /// assert_eq!(instr.encode(), 0b111_0000010_010_000);
    ///
    /// let instr = CompInstr::new(None, "0", Some("JMP"));
    /// assert_eq!(instr.encode(), 0b111_0101010_000_111);
    /// ```
    pub fn encode(&self) -> u16 {
        let comp = mnemonic::encode_comp(&self.comp);
        let dest = mnemonic::encode_dest(self.dest.as_deref());
        let jump = mnemonic::encode_jump(self.jump.as_deref());

        mnemonic::pack(comp, dest, jump)
    }
}
impl std::fmt::Display for CompInstr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(dest) = &self.dest {
            write!(f, "{dest}=")?;
        }
        f.write_str(&self.comp)?;
        if let Some(jump) = &self.jump {
            write!(f, ";{jump}")?;
        }
        Ok(())
    }
}

/// A classified line of Hack assembly.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Instr {
    /// An A-instruction (`@value`).
    Addr(Operand),
    /// A label declaration (`(LABEL)`).
    ///
    /// This takes no space in memory.
    Label(String),
    /// A C-instruction (`dest=comp;jump`).
    Comp(CompInstr),
}
impl Instr {
    /// Whether this instruction occupies an address in instruction memory.
    pub fn is_executable(&self) -> bool {
        !matches!(self, Instr::Label(_))
    }
}
impl std::fmt::Display for Instr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instr::Addr(op)    => write!(f, "@{op}"),
            Instr::Label(name) => write!(f, "({name})"),
            Instr::Comp(instr) => instr.fmt(f),
        }
    }
}

/// A classified instruction, together with where it appears in source.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Stmt {
    /// The instruction.
    pub nucleus: Instr,
    /// The span of the line (excluding surrounding whitespace and comments) in source.
    pub span: Range<usize>,
}

#[cfg(test)]
mod tests {
    use super::{CompInstr, Instr, Operand};

    #[test]
    fn test_display() {
        assert_eq!(Instr::Addr(Operand::Literal(21)).to_string(), "@21");
        assert_eq!(Instr::Addr(Operand::Symbol("LOOP".into())).to_string(), "@LOOP");
        assert_eq!(Instr::Label("END".into()).to_string(), "(END)");
        assert_eq!(Instr::Comp(CompInstr::new(Some("AM"), "M-1", Some("JNE"))).to_string(), "AM=M-1;JNE");
        assert_eq!(Instr::Comp(CompInstr::new(None, "0", Some("JMP"))).to_string(), "0;JMP");
        assert_eq!(Instr::Comp(CompInstr::new(Some("M"), "D", None)).to_string(), "M=D");
    }

    #[test]
    fn test_encode() {
        // scenario values
        assert_eq!(CompInstr::new(Some("D"), "A", None).encode(),   0b1110110000010000);
        assert_eq!(CompInstr::new(Some("D"), "D+A", None).encode(), 0b1110000010010000);
        assert_eq!(CompInstr::new(Some("M"), "D", None).encode(),   0b1110001100001000);
        assert_eq!(CompInstr::new(None, "D+A", None).encode(),      0b1110000010000000);

        // memory-register computation sets the a-bit
        assert_eq!(CompInstr::new(Some("M"), "M-1", None).encode(), 0b1111110010001000);
        assert_eq!(CompInstr::new(Some("AMD"), "D|M", Some("JLE")).encode(), 0b1111010101111110);
    }

    #[test]
    fn test_encode_unknown() {
        // Unknown computation: a-bit is kept, c-bits are zero.
        assert_eq!(CompInstr::new(None, "M+D", None).encode(), 0b1111000000000000);
        assert_eq!(CompInstr::new(None, "Q", Some("JXX")).encode(), 0b1110000000000000);
    }

    #[test]
    fn test_is_executable() {
        assert!(Instr::Addr(Operand::Literal(0)).is_executable());
        assert!(Instr::Comp(CompInstr::new(None, "0", None)).is_executable());
        assert!(!Instr::Label("X".into()).is_executable());
    }
}
