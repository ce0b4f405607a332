//! Production du listing désassemblé
//!
//! La boucle de décodage lit un opcode, choisit la famille correspondante,
//! puis émet soit l'instruction décodée, soit les octets bruts via le
//! chemin de repli. Chaque octet lu après le décalage de départ est couvert
//! par exactement une ligne, à l'exception des `halt` supprimés.

pub mod cursor;
pub mod fallback;
pub mod formatter;

use log::{debug, info, trace, warn};
use std::io::{Read, Write};

pub use cursor::*;
pub use fallback::*;
pub use formatter::*;

use crate::config::DisassemblerConfig;
use crate::error::DisasmError;
use crate::isa::{decode_instruction, DecodeOutcome, Instruction};

/// Une ligne du listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// Adresse relative au décalage de départ
    pub address: u64,

    /// Octets bruts couverts par la ligne
    pub encoding: Vec<u8>,

    /// Mnémonique ou directive de données
    pub mnemonic: &'static str,

    /// Opérandes dans l'ordre d'affichage
    pub operands: Vec<String>,
}

impl DecodedLine {
    pub fn from_instruction(address: u64, instruction: &Instruction, encoding: Vec<u8>) -> Self {
        debug_assert_eq!(encoding.len(), instruction.size());
        Self {
            address,
            encoding,
            mnemonic: instruction.mnemonic(),
            operands: instruction.operands(),
        }
    }

    /// Vrai pour les lignes `.quad` et `.byte`
    pub fn is_data(&self) -> bool {
        self.mnemonic == QUAD_DIRECTIVE || self.mnemonic == BYTE_DIRECTIVE
    }

    /// Adresse de la ligne suivante
    pub fn next_address(&self) -> u64 {
        self.address + self.encoding.len() as u64
    }
}

/// Rendu aux largeurs de colonnes par défaut (22 / 8), sans fin de ligne.
/// Pour les largeurs configurées, voir [`Disassembler::render_line`].
impl std::fmt::Display for DecodedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(format_line(self).trim_end_matches('\n'))
    }
}

/// Statistiques d'un passage de désassemblage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisasmStats {
    /// Octets ignorés avant l'adresse 0
    pub skipped: u64,

    /// Octets lus après le décalage
    pub bytes_consumed: u64,

    pub instructions: u64,
    pub quads: u64,
    pub bytes: u64,

    /// `halt` consommés sans ligne émise
    pub suppressed_halts: u64,
}

impl DisasmStats {
    pub fn lines(&self) -> u64 {
        self.instructions + self.quads + self.bytes
    }

    fn record(&mut self, line: &DecodedLine) {
        match line.mnemonic {
            QUAD_DIRECTIVE => self.quads += 1,
            BYTE_DIRECTIVE => self.bytes += 1,
            _ => self.instructions += 1,
        }
    }
}

/// Désassembleur Y86-64
#[derive(Debug)]
pub struct Disassembler {
    config: DisassemblerConfig,
    format: LineFormat,

    /// Vrai tant qu'un `halt` ne doit pas produire de ligne
    suppress_halt: bool,

    stats: DisasmStats,
}

impl Disassembler {
    pub fn new() -> Self {
        let config = DisassemblerConfig::default();
        Self {
            format: config.listing.line_format(),
            config,
            suppress_halt: true,
            stats: DisasmStats::default(),
        }
    }

    pub fn with_config(config: DisassemblerConfig) -> Result<Self, DisasmError> {
        config.validate()?;
        Ok(Self {
            format: config.listing.line_format(),
            config,
            suppress_halt: true,
            stats: DisasmStats::default(),
        })
    }

    pub fn config(&self) -> &DisassemblerConfig {
        &self.config
    }

    /// Statistiques du dernier passage
    pub fn stats(&self) -> &DisasmStats {
        &self.stats
    }

    /// Réinitialise l'état de décodage avant un nouveau passage
    pub fn reset(&mut self) {
        self.suppress_halt = true;
        self.stats = DisasmStats::default();
    }

    /// Rend une ligne avec les largeurs de colonnes configurées
    pub fn render_line(&self, line: &DecodedLine) -> String {
        self.format.render(line)
    }

    /// Désassemble `source` et écrit le listing dans `sink`
    pub fn run<R: Read, W: Write>(
        &mut self,
        source: R,
        mut sink: W,
    ) -> Result<DisasmStats, DisasmError> {
        let format = self.format;
        let stats = self.walk(source, |line| {
            sink.write_all(format.render(line).as_bytes())?;
            Ok(())
        })?;
        sink.flush()?;
        Ok(stats)
    }

    /// Désassemble `source` en mémoire
    pub fn decode<R: Read>(&mut self, source: R) -> Result<Vec<DecodedLine>, DisasmError> {
        let mut lines = Vec::new();
        self.walk(source, |line| {
            lines.push(line.clone());
            Ok(())
        })?;
        Ok(lines)
    }

    pub fn decode_bytes(&mut self, data: &[u8]) -> Result<Vec<DecodedLine>, DisasmError> {
        self.decode(data)
    }

    /// Rend le listing textuel d'un tampon
    pub fn render_bytes(&mut self, data: &[u8]) -> Result<String, DisasmError> {
        let mut output = Vec::new();
        self.run(data, &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    fn walk<R, F>(&mut self, source: R, mut emit: F) -> Result<DisasmStats, DisasmError>
    where
        R: Read,
        F: FnMut(&DecodedLine) -> Result<(), DisasmError>,
    {
        self.reset();

        let start_offset = self.config.input.start_offset;
        let mut cursor = ByteCursor::new(source);
        self.stats.skipped = cursor.skip(start_offset)?;
        if self.stats.skipped < start_offset {
            warn!(
                "Décalage de départ {:#x} au-delà de la fin de l'entrée ({} octets)",
                start_offset, self.stats.skipped
            );
        }

        let mut address = 0u64;
        while let Some(opcode) = cursor.next_byte()? {
            let lines = match decode_instruction(opcode, &mut cursor)? {
                DecodeOutcome::Decoded {
                    instruction,
                    encoding,
                } => {
                    if instruction == Instruction::Halt {
                        if self.suppress_halt {
                            self.stats.suppressed_halts += 1;
                            address += 1;
                            continue;
                        }
                        self.suppress_halt = true;
                    } else {
                        self.suppress_halt = false;
                    }
                    vec![DecodedLine::from_instruction(address, &instruction, encoding)]
                }
                DecodeOutcome::ValidationFailed(consumed) => {
                    self.suppress_halt = false;
                    debug!(
                        "Opérandes invalides à {:#x} ({} octet(s)), repli sur les données",
                        address,
                        consumed.len()
                    );
                    fallback::absorb_invalid(address, consumed, &mut cursor)?
                }
                DecodeOutcome::Truncated(consumed) => {
                    self.suppress_halt = false;
                    fallback::absorb_truncated(address, &consumed)
                }
            };

            for line in &lines {
                trace!("{}", self.render_line(line).trim_end_matches('\n'));
                self.stats.record(line);
                address = line.next_address();
                emit(line)?;
            }
        }

        self.stats.bytes_consumed = cursor.position();
        self.log_summary();
        Ok(self.stats.clone())
    }

    fn log_summary(&self) {
        let stats = &self.stats;
        if self.config.debug.log_summary {
            info!(
                "{} octet(s) désassemblé(s): {} instruction(s), {} .quad, {} .byte, {} halt supprimé(s)",
                stats.bytes_consumed,
                stats.instructions,
                stats.quads,
                stats.bytes,
                stats.suppressed_halts
            );
        } else {
            debug!(
                "{} octet(s) désassemblé(s), {} ligne(s)",
                stats.bytes_consumed,
                stats.lines()
            );
        }
    }
}

impl Default for Disassembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Désassemble `source` vers `sink` à partir de `start_offset`
pub fn disassemble<R: Read, W: Write>(
    source: R,
    sink: W,
    start_offset: u64,
) -> Result<DisasmStats, DisasmError> {
    Disassembler::with_config(DisassemblerConfig::with_start_offset(start_offset))?.run(source, sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(data: &[u8]) -> Vec<DecodedLine> {
        Disassembler::new().decode_bytes(data).unwrap()
    }

    #[test]
    fn test_leading_halt_suppressed() {
        assert!(decode(&[0x00]).is_empty());
        assert!(decode(&[0x00, 0x00, 0x00]).is_empty());
    }

    #[test]
    fn test_halt_after_instruction() {
        let lines = decode(&[0x10, 0x00]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].mnemonic, "nop");
        assert_eq!(lines[1].mnemonic, "halt");
        assert_eq!(lines[1].address, 1);
    }

    #[test]
    fn test_repeated_halt_absorbed() {
        let mut disassembler = Disassembler::new();
        let lines = disassembler.decode_bytes(&[0x10, 0x00, 0x00]).unwrap();
        let mnemonics: Vec<_> = lines.iter().map(|line| line.mnemonic).collect();
        assert_eq!(mnemonics, vec!["nop", "halt"]);
        assert_eq!(disassembler.stats().suppressed_halts, 1);
        assert_eq!(disassembler.stats().bytes_consumed, 3);
    }

    #[test]
    fn test_halt_after_data() {
        let lines = decode(&[0xFF, 0x00]);
        let mnemonics: Vec<_> = lines.iter().map(|line| line.mnemonic).collect();
        assert_eq!(mnemonics, vec![".byte", ".byte"]);
    }

    #[test]
    fn test_address_after_suppressed_halt() {
        let lines = decode(&[0x00, 0x00, 0x90]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].mnemonic, "ret");
        assert_eq!(lines[0].address, 2);
    }

    #[test]
    fn test_state_reset_between_runs() {
        let mut disassembler = Disassembler::new();
        let first = disassembler.render_bytes(&[0x10, 0x00, 0x20, 0x12]).unwrap();
        let second = disassembler.render_bytes(&[0x10, 0x00, 0x20, 0x12]).unwrap();
        assert_eq!(first, second);

        // Le drapeau de suppression repart de zéro
        assert!(disassembler.decode_bytes(&[0x00]).unwrap().is_empty());
    }

    #[test]
    fn test_start_offset() {
        let config = DisassemblerConfig::with_start_offset(2);
        let mut disassembler = Disassembler::with_config(config).unwrap();
        let lines = disassembler.decode_bytes(&[0xAA, 0xBB, 0x10, 0x90]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].address, 0);
        assert_eq!(lines[1].address, 1);
        assert_eq!(disassembler.stats().skipped, 2);
    }

    #[test]
    fn test_display_has_no_newline() {
        let lines = decode(&[0x90]);
        assert_eq!(
            lines[0].to_string(),
            "0000000000000000: 90                    ret     "
        );
    }

    #[test]
    fn test_render_line_uses_configured_widths() {
        let mut config = DisassemblerConfig::default();
        config.listing.encoding_width = 24;
        config.listing.mnemonic_width = 10;
        let disassembler = Disassembler::with_config(config).unwrap();

        let lines = decode(&[0x90]);
        assert_eq!(
            disassembler.render_line(&lines[0]),
            "0000000000000000: 90                      ret       \n"
        );
        assert_ne!(disassembler.render_line(&lines[0]), format_line(&lines[0]));
    }
}
