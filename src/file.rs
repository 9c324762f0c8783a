//! Assembling programs from and into files and streams.
//!
//! - [`assemble_stream`] assembles any [`Read`] into any [`Write`].
//! - [`assemble_file`] assembles `Prog.asm` into `Prog.hack` next to it.
//!
//! Output is always in the [`TextFormat`].

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::asm::encoding::{ObjFileFormat, TextFormat};
use crate::asm::{AsmErr, AsmFlags, Assembler, HackFile};
use crate::err::ErrSpan;
use crate::parse::SourceInfo;

/// The extension of assembly source files.
pub const ASM_EXT: &str = "asm";
/// The extension of assembled program files.
pub const HACK_EXT: &str = "hack";

/// Error from reading, assembling, or writing a program.
#[derive(Debug)]
pub enum FileErr {
    /// The source path does not end in `.asm`.
    InvalidExtension(PathBuf),
    /// The source could not be read or the output could not be written.
    Io(std::io::Error),
    /// The source did not assemble.
    Asm(AsmErr),
}
impl std::fmt::Display for FileErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileErr::InvalidExtension(p) => write!(f, "expected an .{ASM_EXT} file, found {}", p.display()),
            FileErr::Io(e)  => write!(f, "i/o error: {e}"),
            FileErr::Asm(e) => e.fmt(f),
        }
    }
}
impl std::error::Error for FileErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileErr::InvalidExtension(_) => None,
            FileErr::Io(e)  => Some(e),
            FileErr::Asm(e) => Some(e),
        }
    }
}
impl crate::err::Error for FileErr {
    fn span(&self) -> Option<ErrSpan> {
        match self {
            FileErr::Asm(e) => crate::err::Error::span(e),
            _ => None
        }
    }

    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            FileErr::InvalidExtension(_) => Some(format!("rename the source file to end in .{ASM_EXT}").into()),
            FileErr::Io(_)  => None,
            FileErr::Asm(e) => crate::err::Error::help(e),
        }
    }
}
impl From<std::io::Error> for FileErr {
    fn from(value: std::io::Error) -> Self {
        FileErr::Io(value)
    }
}
impl From<AsmErr> for FileErr {
    fn from(value: AsmErr) -> Self {
        FileErr::Asm(value)
    }
}

/// Computes the output path for a source path.
///
/// This fails if the source path does not have an `.asm` extension.
///
/// ## Example
/// ```
/// use std::path::Path;
/// use hack_asm::file::hack_path;
///
/// assert_eq!(hack_path(Path::new("prog/Max.asm")).unwrap(), Path::new("prog/Max.hack"));
/// assert!(hack_path(Path::new("prog/Max.txt")).is_err());
/// assert!(hack_path(Path::new("prog/Max")).is_err());
/// ```
pub fn hack_path(src: &Path) -> Result<PathBuf, FileErr> {
    match src.extension() {
        Some(ext) if ext == ASM_EXT => Ok(src.with_extension(HACK_EXT)),
        _ => Err(FileErr::InvalidExtension(src.to_path_buf())),
    }
}

/// Reads assembly from `input`, assembles it, and writes the `.hack` text to `output`.
///
/// Nothing is written if reading or assembling fails.
///
/// ## Example
/// ```
/// use hack_asm::file::assemble_stream;
///
/// let mut out = vec![];
/// let hack = assemble_stream("@2\nD=A\n".as_bytes(), &mut out, Default::default()).unwrap();
///
/// assert_eq!(hack.words().len(), 2);
/// assert_eq!(out, b"0000000000000010\n1110110000010000\n");
/// ```
pub fn assemble_stream<R: Read, W: Write>(mut input: R, mut output: W, flags: AsmFlags) -> Result<HackFile, FileErr> {
    let mut src = String::new();
    input.read_to_string(&mut src)?;

    let hack = Assembler::from_source(SourceInfo::from(src), flags).assemble()?;
    output.write_all(TextFormat::serialize(&hack).as_bytes())?;
    output.flush()?;

    Ok(hack)
}

/// Assembles the `.asm` file at `path` into a `.hack` file beside it.
///
/// This returns the path of the written file.
/// The output file is only created once assembly succeeds.
pub fn assemble_file(path: impl AsRef<Path>, flags: AsmFlags) -> Result<PathBuf, FileErr> {
    let path = path.as_ref();
    let out_path = hack_path(path)?;

    let src = std::fs::read_to_string(path)?;
    let hack = Assembler::from_source(SourceInfo::from(src), flags).assemble()?;
    std::fs::write(&out_path, TextFormat::serialize(&hack))?;

    Ok(out_path)
}
