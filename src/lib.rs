//! A two-pass assembler for the Hack 16-bit computer.
//!
//! Hack assembly has three kinds of lines:
//! - A-instructions (`@21`, `@LOOP`, `@i`), which load an address,
//! - C-instructions (`D=D+A`, `0;JMP`, `AM=M-1;JNE`), which compute and jump,
//! - label declarations (`(LOOP)`), which name the address of the next instruction.
//!
//! Each instruction assembles into one 16-bit machine word.
//!
//! # Usage
//!
//! To convert Hack source code to machine words, assemble it:
//! ```
//! use hack_asm::asm::{assemble, assemble_debug, HackFile};
//!
//! let code = "
//!     // Computes R0 = 2 + 3
//!     @2
//!     D=A
//!     @3
//!     D=D+A
//!     @0
//!     M=D
//! ";
//! let hack: HackFile = assemble(code).unwrap();
//! assert_eq!(hack.words().len(), 6);
//!
//! // OR, keeping the symbol table:
//! let hack: HackFile = assemble_debug(code).unwrap();
//! assert!(hack.symbol_table().is_some());
//! ```
//!
//! Once a program has been assembled, it can be written out in a format from [`asm::encoding`]:
//! ```
//! # use hack_asm::asm::assemble;
//! # let hack = assemble("@2\nD=A").unwrap();
//! use hack_asm::asm::encoding::{ObjFileFormat, TextFormat};
//!
//! let text = TextFormat::serialize(&hack);
//! assert_eq!(text, "0000000000000010\n1110110000010000\n");
//! ```
//!
//! The [`file`] module assembles `.asm` files and streams directly.
//! Errors can be rendered against their source with [`err::report`].
#![warn(missing_docs)]

pub mod parse;
pub mod ast;
pub mod asm;
pub mod err;
pub mod file;
