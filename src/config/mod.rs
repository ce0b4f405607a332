//! Configuration du désassembleur

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::DisasmError;
use crate::listing::formatter::{LineFormat, DEFAULT_ENCODING_WIDTH, DEFAULT_MNEMONIC_WIDTH};

/// Encodage le plus long : 10 octets, 2 chiffres par octet
const MIN_ENCODING_WIDTH: usize = 20;

/// Mnémonique la plus longue ("rrmovq", "cmovge", ...)
const MIN_MNEMONIC_WIDTH: usize = 6;

/// Configuration principale du désassembleur
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisassemblerConfig {
    pub input: InputConfig,
    pub listing: ListingConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Octets ignorés avant l'adresse 0
    pub start_offset: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub encoding_width: usize,
    pub mnemonic_width: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Journalise le résumé d'exécution au niveau `info`
    pub log_summary: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            encoding_width: DEFAULT_ENCODING_WIDTH,
            mnemonic_width: DEFAULT_MNEMONIC_WIDTH,
        }
    }
}

impl ListingConfig {
    pub fn line_format(&self) -> LineFormat {
        LineFormat {
            encoding_width: self.encoding_width,
            mnemonic_width: self.mnemonic_width,
        }
    }
}

impl DisassemblerConfig {
    pub fn with_start_offset(start_offset: u64) -> Self {
        Self {
            input: InputConfig { start_offset },
            ..Self::default()
        }
    }

    /// Vérifie que les colonnes peuvent contenir toute ligne émise
    pub fn validate(&self) -> std::result::Result<(), DisasmError> {
        if self.listing.encoding_width < MIN_ENCODING_WIDTH {
            return Err(DisasmError::Config(format!(
                "largeur d'encodage {} < {}",
                self.listing.encoding_width, MIN_ENCODING_WIDTH
            )));
        }
        if self.listing.mnemonic_width < MIN_MNEMONIC_WIDTH {
            return Err(DisasmError::Config(format!(
                "largeur de mnémonique {} < {}",
                self.listing.mnemonic_width, MIN_MNEMONIC_WIDTH
            )));
        }
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DisassemblerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn load_or_default(path: &str) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }
}
