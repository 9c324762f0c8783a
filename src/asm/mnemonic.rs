//! Mnemonic tables for the fields of a C-instruction.
//!
//! A C-instruction is laid out as `111a cccc ccdd djjj`:
//! - [`encode_comp`] produces the 7-bit `a cccccc` field,
//! - [`encode_dest`] produces the 3-bit `ddd` field,
//! - [`encode_jump`] produces the 3-bit `jjj` field.
//!
//! [`pack`] combines the three into a machine word.
//!
//! The `encode_*` functions are total: anything not in a table encodes to zero bits.
//! The `lookup_*` functions return `None` instead, and are used by strict assembly.

/// ALU control bits for each computation, written in terms of the `A` register.
///
/// Computations on `M` use the same bits with the `a` bit set.
const COMP_TABLE: [(&str, u16); 18] = [
    ("0",   0b101010),
    ("1",   0b111111),
    ("-1",  0b111010),
    ("D",   0b001100),
    ("A",   0b110000),
    ("!D",  0b001101),
    ("!A",  0b110001),
    ("-D",  0b001111),
    ("-A",  0b110011),
    ("D+1", 0b011111),
    ("A+1", 0b110111),
    ("D-1", 0b001110),
    ("A-1", 0b110010),
    ("D+A", 0b000010),
    ("D-A", 0b010011),
    ("A-D", 0b000111),
    ("D&A", 0b000000),
    ("D|A", 0b010101),
];

const JUMP_TABLE: [(&str, u16); 7] = [
    ("JGT", 0b001),
    ("JEQ", 0b010),
    ("JGE", 0b011),
    ("JLT", 0b100),
    ("JNE", 0b101),
    ("JLE", 0b110),
    ("JMP", 0b111),
];

fn table_get(table: &[(&str, u16)], key: &str) -> Option<u16> {
    table.iter()
        .find(|&&(k, _)| k == key)
        .map(|&(_, v)| v)
}

/// Splits a computation into its `a` bit and its `A`-normalized form.
fn split_comp(mnemonic: &str) -> (u16, std::borrow::Cow<str>) {
    match mnemonic.contains('M') {
        true  => (1, mnemonic.replace('M', "A").into()),
        false => (0, mnemonic.into()),
    }
}

/// Gets the 7-bit computation field for a mnemonic, if it is a known computation.
///
/// ## Example
/// ```
/// use hack_asm::asm::mnemonic::lookup_comp;
///
/// assert_eq!(lookup_comp("D+A"), Some(0b0_000010));
/// assert_eq!(lookup_comp("D+M"), Some(0b1_000010));
/// assert_eq!(lookup_comp("A+D"), None);
/// ```
pub fn lookup_comp(mnemonic: &str) -> Option<u16> {
    let (a, key) = split_comp(mnemonic);
    table_get(&COMP_TABLE, &key).map(|c| a << 6 | c)
}

/// Encodes a computation mnemonic into the 7-bit computation field.
///
/// The `a` bit is set whenever the mnemonic mentions `M`,
/// even if the rest of the mnemonic is unknown.
pub fn encode_comp(mnemonic: &str) -> u16 {
    let (a, key) = split_comp(mnemonic);
    a << 6 | table_get(&COMP_TABLE, &key).unwrap_or(0)
}

/// Gets the 3-bit destination field for a mnemonic, if it only names `A`, `D`, and `M`
/// (each at most once).
///
/// ## Example
/// ```
/// use hack_asm::asm::mnemonic::lookup_dest;
///
/// assert_eq!(lookup_dest("AMD"), Some(0b111));
/// assert_eq!(lookup_dest("MD"), Some(0b011));
/// assert_eq!(lookup_dest("MM"), None);
/// assert_eq!(lookup_dest("X"), None);
/// ```
pub fn lookup_dest(mnemonic: &str) -> Option<u16> {
    let mut bits = 0;
    for c in mnemonic.chars() {
        let bit = match c {
            'A' => 0b100,
            'D' => 0b010,
            'M' => 0b001,
            _ => return None,
        };
        if bits & bit != 0 { return None; }
        bits |= bit;
    }

    (bits != 0).then_some(bits)
}

/// Encodes a destination mnemonic into the 3-bit destination field.
///
/// Each register bit is set if the mnemonic contains that register anywhere.
/// No destination encodes as `000`.
pub fn encode_dest(mnemonic: Option<&str>) -> u16 {
    let Some(m) = mnemonic else { return 0 };

    let mut bits = 0;
    if m.contains('A') { bits |= 0b100; }
    if m.contains('D') { bits |= 0b010; }
    if m.contains('M') { bits |= 0b001; }
    bits
}

/// Packs the fields of a C-instruction into a machine word.
///
/// ## Example
/// ```
/// use hack_asm::asm::mnemonic::pack;
///
/// assert_eq!(pack(0b0_000010, 0b010, 0b000), 0b1110000010010000);
/// ```
pub fn pack(comp: u16, dest: u16, jump: u16) -> u16 {
    0b111 << 13 | comp << 6 | dest << 3 | jump
}

/// Gets the 3-bit jump field for a mnemonic, if it is a known jump.
pub fn lookup_jump(mnemonic: &str) -> Option<u16> {
    table_get(&JUMP_TABLE, mnemonic)
}

/// Encodes a jump mnemonic into the 3-bit jump field.
///
/// No jump (or an unknown jump) encodes as `000`.
pub fn encode_jump(mnemonic: Option<&str>) -> u16 {
    mnemonic.and_then(lookup_jump).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comp_table() {
        let expected = [
            ("0", "0101010"), ("1", "0111111"), ("-1", "0111010"),
            ("D", "0001100"), ("A", "0110000"), ("!D", "0001101"),
            ("!A", "0110001"), ("-D", "0001111"), ("-A", "0110011"),
            ("D+1", "0011111"), ("A+1", "0110111"), ("D-1", "0001110"),
            ("A-1", "0110010"), ("D+A", "0000010"), ("D-A", "0010011"),
            ("A-D", "0000111"), ("D&A", "0000000"), ("D|A", "0010101"),
            ("M", "1110000"), ("!M", "1110001"), ("-M", "1110011"),
            ("M+1", "1110111"), ("M-1", "1110010"), ("D+M", "1000010"),
            ("D-M", "1010011"), ("M-D", "1000111"), ("D&M", "1000000"),
            ("D|M", "1010101"),
        ];

        for (m, bits) in expected {
            assert_eq!(format!("{:07b}", encode_comp(m)), bits, "comp {m}");
            assert_eq!(lookup_comp(m), Some(encode_comp(m)), "comp {m}");
        }
    }

    #[test]
    fn test_comp_unknown() {
        assert_eq!(encode_comp("A+D"), 0b0_000000);
        assert_eq!(encode_comp("M+D"), 0b1_000000);
        assert_eq!(encode_comp(""), 0);
        assert_eq!(lookup_comp("A+D"), None);
        assert_eq!(lookup_comp("M+D"), None);
        assert_eq!(lookup_comp(""), None);
    }

    #[test]
    fn test_dest() {
        assert_eq!(encode_dest(None), 0b000);
        assert_eq!(encode_dest(Some("M")), 0b001);
        assert_eq!(encode_dest(Some("D")), 0b010);
        assert_eq!(encode_dest(Some("MD")), 0b011);
        assert_eq!(encode_dest(Some("DM")), 0b011);
        assert_eq!(encode_dest(Some("A")), 0b100);
        assert_eq!(encode_dest(Some("AM")), 0b101);
        assert_eq!(encode_dest(Some("AD")), 0b110);
        assert_eq!(encode_dest(Some("AMD")), 0b111);

        // Permissive: only membership is checked.
        assert_eq!(encode_dest(Some("XAX")), 0b100);
        assert_eq!(encode_dest(Some("")), 0b000);

        assert_eq!(lookup_dest("XAX"), None);
        assert_eq!(lookup_dest(""), None);
        assert_eq!(lookup_dest("ADA"), None);
        assert_eq!(lookup_dest("DM"), Some(0b011));
    }

    #[test]
    fn test_jump() {
        assert_eq!(encode_jump(None), 0b000);
        let jumps = ["JGT", "JEQ", "JGE", "JLT", "JNE", "JLE", "JMP"];
        for (i, j) in jumps.into_iter().enumerate() {
            assert_eq!(encode_jump(Some(j)), i as u16 + 1, "jump {j}");
        }

        assert_eq!(encode_jump(Some("JXX")), 0b000);
        assert_eq!(encode_jump(Some("jmp")), 0b000);
        assert_eq!(lookup_jump("JXX"), None);
    }
}
