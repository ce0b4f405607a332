//! Y86 Disasm - Désassembleur Y86-64
//!
//! Cette bibliothèque transforme un flux d'octets de code machine Y86-64 en
//! listing annoté : adresse, encodage brut, mnémonique et opérandes. Tout
//! octet qui ne forme pas une instruction valide est rendu comme donnée
//! brute (`.quad` ou `.byte`), le décodage ne rejette donc jamais l'entrée.

pub mod isa;
pub mod listing;
pub mod config;
pub mod error;

pub use isa::*;
pub use listing::*;
pub use config::*;
pub use error::*;

/// Version du désassembleur
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Taille maximale d'une instruction Y86-64 (irmovq, rmmovq, mrmovq)
pub const MAX_INSTRUCTION_SIZE: usize = 10;

/// Nombre de registres généraux
pub const REGISTER_COUNT: usize = 15;
