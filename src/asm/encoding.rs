//! Formatters which can read and write assembled programs.
//!
//! The [`ObjFileFormat`] trait describes an implementation of reading/writing a [`HackFile`].
//! This module provides two implementations of the trait:
//! - [`TextFormat`]: the `.hack` text representation, one word per line
//! - [`BinaryFormat`]: a raw binary representation, two bytes per word
//!
//! Neither format carries the symbol table.

use super::HackFile;

/// A trait defining object file formats.
pub trait ObjFileFormat {
    /// Representation of the serialized format.
    ///
    /// For binary formats, `[u8]` should be used.
    /// For text-based formats,`str` should be used.
    type Stream: ToOwned + ?Sized;
    /// Serializes into the stream format.
    fn serialize(o: &HackFile) -> <Self::Stream as ToOwned>::Owned;
    /// Deserializes from the stream format, returning `None`
    /// if the stream is not a valid program.
    fn deserialize(i: &Self::Stream) -> Option<HackFile>;
}

/// The `.hack` text format.
///
/// Each word is written as 16 ASCII `0`/`1` characters (most significant bit first),
/// and each line ends with `\n`.
///
/// ## Example
/// ```
/// use hack_asm::asm::assemble;
/// use hack_asm::asm::encoding::{ObjFileFormat, TextFormat};
///
/// let hack = assemble("@2\nD=A").unwrap();
/// let text = TextFormat::serialize(&hack);
/// assert_eq!(text, "0000000000000010\n1110110000010000\n");
///
/// assert_eq!(TextFormat::deserialize(&text).unwrap().words(), hack.words());
/// ```
pub struct TextFormat;

impl ObjFileFormat for TextFormat {
    type Stream = str;

    fn serialize(o: &HackFile) -> <Self::Stream as ToOwned>::Owned {
        let mut buf = String::with_capacity(o.words().len() * 17);
        for line in o.lines() {
            buf.push_str(&line);
            buf.push('\n');
        }
        buf
    }

    fn deserialize(i: &Self::Stream) -> Option<HackFile> {
        i.lines()
            .map(|line| {
                let valid = line.len() == 16 && line.bytes().all(|b| matches!(b, b'0' | b'1'));
                valid.then(|| u16::from_str_radix(line, 2).ok()).flatten()
            })
            .collect::<Option<_>>()
            .map(HackFile::new)
    }
}

/// A raw binary format.
///
/// Each word is written as 2 bytes, big-endian. There is no header.
///
/// ## Example
/// ```
/// use hack_asm::asm::assemble;
/// use hack_asm::asm::encoding::{ObjFileFormat, BinaryFormat};
///
/// let hack = assemble("@2\nD=A").unwrap();
/// let bytes = BinaryFormat::serialize(&hack);
/// assert_eq!(bytes, [0x00, 0x02, 0xEC, 0x10]);
/// ```
pub struct BinaryFormat;

impl ObjFileFormat for BinaryFormat {
    type Stream = [u8];

    fn serialize(o: &HackFile) -> <Self::Stream as ToOwned>::Owned {
        o.words().iter()
            .flat_map(|w| w.to_be_bytes())
            .collect()
    }

    fn deserialize(i: &Self::Stream) -> Option<HackFile> {
        let chunks = i.chunks_exact(2);
        if !chunks.remainder().is_empty() { return None; }

        let words = chunks
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        Some(HackFile::new(words))
    }
}

#[cfg(test)]
mod tests {
    use crate::asm::{assemble, assemble_debug, HackFile};

    use super::{BinaryFormat, ObjFileFormat, TextFormat};

    const MAX_SRC: &str = "
        @R0
        D=M
        @R1
        D=D-M
        @OUTPUT_FIRST
        D;JGT
        @R1
        D=M
        @OUTPUT_D
        0;JMP
    (OUTPUT_FIRST)
        @R0
        D=M
    (OUTPUT_D)
        @R2
        M=D
    (INFINITE_LOOP)
        @INFINITE_LOOP
        0;JMP
    ";

    #[test]
    fn test_text() {
        let hack = assemble(MAX_SRC).unwrap();
        let text = TextFormat::serialize(&hack);
        assert_eq!(text.lines().count(), 16);
        assert!(text.ends_with('\n'));
        assert!(text.lines().all(|l| l.len() == 16));

        assert_eq!(TextFormat::deserialize(&text), Some(hack));
    }

    #[test]
    fn test_text_drops_symbols() {
        let hack = assemble_debug(MAX_SRC).unwrap();
        let back = TextFormat::deserialize(&TextFormat::serialize(&hack)).unwrap();
        assert_eq!(back.words(), hack.words());
        assert!(back.symbol_table().is_none());
    }

    #[test]
    fn test_text_empty() {
        let hack = HackFile::new(vec![]);
        assert_eq!(TextFormat::serialize(&hack), "");
        assert_eq!(TextFormat::deserialize(""), Some(hack));
    }

    #[test]
    fn test_text_invalid() {
        assert_eq!(TextFormat::deserialize("000000000000001\n"), None);
        assert_eq!(TextFormat::deserialize("00000000000000010\n"), None);
        assert_eq!(TextFormat::deserialize("000000000000002\n"), None);
        assert_eq!(TextFormat::deserialize("0000000000000010\n\n"), None);
        assert_eq!(TextFormat::deserialize("+000000000000010\n"), None);

        let crlf = TextFormat::deserialize("0000000000000010\r\n1110110000010000\r\n").unwrap();
        assert_eq!(crlf.words(), [2, 0b1110110000010000]);
    }

    #[test]
    fn test_binary() {
        let hack = assemble(MAX_SRC).unwrap();
        let bytes = BinaryFormat::serialize(&hack);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..4], [0x00, 0x00, 0xFC, 0x10]);

        assert_eq!(BinaryFormat::deserialize(&bytes), Some(hack));
        assert_eq!(BinaryFormat::deserialize(&bytes[..31]), None);
        assert_eq!(BinaryFormat::deserialize(&[]), Some(HackFile::new(vec![])));
    }
}
