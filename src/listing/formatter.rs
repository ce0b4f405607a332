//! Mise en forme des lignes du listing
//!
//! Format d'une ligne :
//!
//! ```text
//! 0000000000000000: 30F40001000000000000  irmovq  $0x100, %rsp
//! ```
//!
//! adresse sur 16 chiffres hexadécimaux, encodage brut en majuscules aligné
//! à gauche sur une colonne fixe, mnémonique sur une colonne fixe, puis les
//! opérandes séparés par `", "`.

use super::DecodedLine;

/// Largeur par défaut de la colonne d'encodage
pub const DEFAULT_ENCODING_WIDTH: usize = 22;

/// Largeur par défaut de la colonne de mnémonique
pub const DEFAULT_MNEMONIC_WIDTH: usize = 8;

/// Largeurs des colonnes du listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    pub encoding_width: usize,
    pub mnemonic_width: usize,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            encoding_width: DEFAULT_ENCODING_WIDTH,
            mnemonic_width: DEFAULT_MNEMONIC_WIDTH,
        }
    }
}

impl LineFormat {
    /// Rend une ligne complète, saut de ligne compris
    pub fn render(&self, line: &DecodedLine) -> String {
        format!(
            "{:016x}: {:<ew$}{:<mw$}{}\n",
            line.address,
            encoding_hex(&line.encoding),
            line.mnemonic,
            line.operands.join(", "),
            ew = self.encoding_width,
            mw = self.mnemonic_width,
        )
    }
}

/// Octets bruts en hexadécimal majuscule, sans séparateur
pub fn encoding_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
}

/// Chiffres hexadécimaux minuscules sans zéros de tête (`0` pour zéro)
pub fn hex_digits(value: u64) -> String {
    format!("{:x}", value)
}

/// Littéral hexadécimal tel qu'affiché dans les opérandes
pub fn hex_literal(value: u64) -> String {
    format!("0x{}", hex_digits(value))
}

/// Rendu avec les largeurs par défaut
pub fn format_line(line: &DecodedLine) -> String {
    LineFormat::default().render(line)
}
