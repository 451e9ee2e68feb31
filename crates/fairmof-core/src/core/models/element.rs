use phf::phf_map;

/// Symbol written for atomic numbers outside the periodic table.
pub const UNKNOWN_SYMBOL: &str = "X";

const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

// Elements commonly met in MOF records; anything else falls back to a linear scan.
static COMMON_NUMBERS: phf::Map<&'static str, u8> = phf_map! {
    "H" => 1, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9,
    "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17,
    "Ca" => 20, "Ti" => 22, "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26,
    "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30, "Br" => 35, "Zr" => 40,
    "Cd" => 48, "I" => 53, "La" => 57, "Hf" => 72,
};

/// Returns the chemical symbol for an atomic number, or `None` outside 1..=118.
pub fn symbol(atomic_number: u8) -> Option<&'static str> {
    let index = usize::from(atomic_number).checked_sub(1)?;
    SYMBOLS.get(index).copied()
}

/// Returns the chemical symbol for an atomic number, or [`UNKNOWN_SYMBOL`].
pub fn symbol_or_unknown(atomic_number: u8) -> &'static str {
    symbol(atomic_number).unwrap_or(UNKNOWN_SYMBOL)
}

/// Returns the atomic number for a case-sensitive chemical symbol.
pub fn atomic_number(symbol: &str) -> Option<u8> {
    if let Some(&z) = COMMON_NUMBERS.get(symbol) {
        return Some(z);
    }
    SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .and_then(|i| u8::try_from(i + 1).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_covers_the_whole_table() {
        assert_eq!(symbol(1), Some("H"));
        assert_eq!(symbol(30), Some("Zn"));
        assert_eq!(symbol(118), Some("Og"));
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(119), None);
    }

    #[test]
    fn unknown_numbers_fall_back_to_placeholder() {
        assert_eq!(symbol_or_unknown(0), "X");
        assert_eq!(symbol_or_unknown(200), "X");
    }

    #[test]
    fn atomic_number_agrees_with_symbol_table() {
        for z in 1..=118u8 {
            let s = symbol(z).unwrap();
            assert_eq!(atomic_number(s), Some(z), "mismatch for {}", s);
        }
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(atomic_number("zn"), None);
    }
}
