//! Registres du jeu d'instructions Y86-64
//!
//! Un champ registre occupe un quartet (4 bits). Les valeurs 0x0 à 0xE
//! désignent l'un des 15 registres, 0xF signifie "aucun registre".

/// Code réservé signifiant l'absence d'opérande registre
pub const NO_REGISTER: u8 = 0xF;

/// Noms des registres, indexés par leur code
const REGISTER_NAMES: [&str; crate::REGISTER_COUNT] = [
    "%rax", "%rcx", "%rdx", "%rbx", "%rsp", "%rbp", "%rsi", "%rdi", "%r8", "%r9", "%r10", "%r11",
    "%r12", "%r13", "%r14",
];

/// Registres généraux du Y86-64
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Rax,
    Rcx,
    Rdx,
    Rbx,
    Rsp,
    Rbp,
    Rsi,
    Rdi,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
}

impl Register {
    const ALL: [Register; crate::REGISTER_COUNT] = [
        Register::Rax,
        Register::Rcx,
        Register::Rdx,
        Register::Rbx,
        Register::Rsp,
        Register::Rbp,
        Register::Rsi,
        Register::Rdi,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
        Register::R12,
        Register::R13,
        Register::R14,
    ];

    /// Convertit un quartet en registre, `None` pour 0xF ou hors plage
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        if is_valid_register(nibble) {
            Some(Self::ALL[nibble as usize])
        } else {
            None
        }
    }

    /// Code 4 bits du registre
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Nom du registre tel qu'affiché dans le listing
    pub fn name(self) -> &'static str {
        REGISTER_NAMES[self as usize]
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Vrai si le quartet désigne un vrai registre (0x0-0xE)
pub fn is_valid_register(nibble: u8) -> bool {
    nibble < NO_REGISTER
}

/// Vrai si le quartet est la sentinelle "aucun registre" (0xF)
pub fn is_no_register(nibble: u8) -> bool {
    nibble == NO_REGISTER
}

/// Sépare un octet d'opérandes en (quartet haut, quartet bas)
pub fn split_register_byte(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validity() {
        for nibble in 0x0..=0xE {
            assert!(is_valid_register(nibble));
            assert!(!is_no_register(nibble));
        }
        assert!(!is_valid_register(0xF));
        assert!(is_no_register(0xF));
    }

    #[test]
    fn test_register_names() {
        assert_eq!(Register::from_nibble(0x0), Some(Register::Rax));
        assert_eq!(Register::from_nibble(0x4).map(Register::name), Some("%rsp"));
        assert_eq!(Register::from_nibble(0xE).map(Register::name), Some("%r14"));
        assert_eq!(Register::from_nibble(0xF), None);
        assert_eq!(Register::R10.code(), 0xA);
    }

    #[test]
    fn test_split_register_byte() {
        assert_eq!(split_register_byte(0x1F), (0x1, 0xF));
        assert_eq!(split_register_byte(0xF3), (0xF, 0x3));
    }
}
