//! Jeu d'instructions Y86-64
//!
//! Registres, tables de mnémoniques, familles d'instructions et décodeurs
//! structurés. Le Y86-64 est un sous-ensemble pédagogique du x86-64 avec des
//! instructions de 1 à 10 octets.

pub mod registers;
pub mod instructions;
pub mod instruction_formats;
pub mod decoder;

pub use registers::*;
pub use instructions::*;
pub use instruction_formats::*;
pub use decoder::*;
