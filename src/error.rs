//! Erreurs du désassembleur
//!
//! Le décodage lui-même n'échoue jamais : seules les défaillances de la
//! source ou de la sortie remontent à l'appelant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisasmError {
    /// Lecture ou écriture impossible
    #[error("Erreur d'entrée/sortie: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration invalide
    #[error("Configuration invalide: {0}")]
    Config(String),
}
