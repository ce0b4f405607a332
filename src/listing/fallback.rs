//! Réinterprétation des octets bruts
//!
//! Quand un décodage structuré échoue, les octets déjà consommés sont
//! complétés jusqu'à former un bloc de 8 octets (`.quad`). Si la source
//! s'épuise avant, chaque octet devient une ligne `.byte` à sa propre
//! adresse. Chaque octet lu apparaît ainsi dans exactement une ligne.

use log::debug;

use super::cursor::ByteSource;
use super::DecodedLine;
use crate::error::DisasmError;
use crate::listing::formatter::hex_literal;

/// Taille d'un bloc de données brutes
pub const QUAD_SIZE: usize = 8;

/// Directive pour un bloc de 8 octets
pub const QUAD_DIRECTIVE: &str = ".quad";

/// Directive pour un octet isolé
pub const BYTE_DIRECTIVE: &str = ".byte";

/// Absorbe les octets d'un décodage invalide, en lisant la suite si besoin
pub fn absorb_invalid<S: ByteSource>(
    start: u64,
    mut consumed: Vec<u8>,
    source: &mut S,
) -> Result<Vec<DecodedLine>, DisasmError> {
    while consumed.len() < QUAD_SIZE {
        match source.next_byte()? {
            Some(byte) => consumed.push(byte),
            None => break,
        }
    }

    if consumed.len() == QUAD_SIZE {
        Ok(vec![quad_line(start, consumed)])
    } else {
        debug!(
            "Fin de flux à {:#x}: {} octet(s) isolé(s)",
            start,
            consumed.len()
        );
        Ok(byte_lines(start, &consumed))
    }
}

/// Absorbe les octets d'une instruction tronquée par la fin du flux
pub fn absorb_truncated(start: u64, consumed: &[u8]) -> Vec<DecodedLine> {
    debug!(
        "Instruction tronquée à {:#x}: {} octet(s) isolé(s)",
        start,
        consumed.len()
    );
    byte_lines(start, consumed)
}

fn quad_line(start: u64, bytes: Vec<u8>) -> DecodedLine {
    let mut value = [0u8; QUAD_SIZE];
    value.copy_from_slice(&bytes);
    DecodedLine {
        address: start,
        operands: vec![hex_literal(u64::from_le_bytes(value))],
        encoding: bytes,
        mnemonic: QUAD_DIRECTIVE,
    }
}

fn byte_lines(start: u64, bytes: &[u8]) -> Vec<DecodedLine> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, &byte)| DecodedLine {
            address: start + i as u64,
            encoding: vec![byte],
            mnemonic: BYTE_DIRECTIVE,
            operands: vec![hex_literal(byte as u64)],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::cursor::ByteCursor;

    #[test]
    fn test_invalid_completed_to_quad() {
        let rest = [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut cursor = ByteCursor::new(&rest[..]);

        let lines = absorb_invalid(0x20, vec![0x20, 0xFF], &mut cursor).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].address, 0x20);
        assert_eq!(lines[0].mnemonic, ".quad");
        assert_eq!(
            lines[0].encoding,
            vec![0x20, 0xFF, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06]
        );
        assert_eq!(lines[0].operands, vec!["0x60504030201ff20".to_string()]);

        // Le dernier octet reste dans la source
        assert_eq!(cursor.next_byte().unwrap(), Some(0x07));
    }

    #[test]
    fn test_invalid_near_end_becomes_bytes() {
        let rest = [0x2Au8];
        let mut cursor = ByteCursor::new(&rest[..]);

        let lines = absorb_invalid(4, vec![0xC0], &mut cursor).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].address, 4);
        assert_eq!(lines[0].operands, vec!["0xc0".to_string()]);
        assert_eq!(lines[1].address, 5);
        assert_eq!(lines[1].mnemonic, ".byte");
        assert_eq!(lines[1].operands, vec!["0x2a".to_string()]);
    }

    #[test]
    fn test_zero_quad() {
        let rest = [0u8; 7];
        let mut cursor = ByteCursor::new(&rest[..]);

        let lines = absorb_invalid(0, vec![0xFF], &mut cursor).unwrap();
        assert_eq!(lines[0].operands, vec!["0xff".to_string()]);

        let zeros = [0u8; 8];
        let mut zeros = ByteCursor::new(&zeros[..]);
        let lines = absorb_invalid(0, Vec::new(), &mut zeros).unwrap();
        assert_eq!(lines[0].operands, vec!["0x0".to_string()]);
    }

    #[test]
    fn test_truncated_never_quad() {
        let consumed = [0x30u8, 0xF0, 1, 2, 3, 4, 5, 6, 7];
        let lines = absorb_truncated(0x100, &consumed);
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|line| line.mnemonic == ".byte"));
        assert_eq!(lines[8].address, 0x108);
    }
}
