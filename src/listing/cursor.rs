//! Curseur sur le flux d'octets à désassembler

use std::io::{Bytes, Read};

use crate::error::DisasmError;

/// Source d'octets séquentielle utilisée par les décodeurs
pub trait ByteSource {
    /// Lit l'octet suivant, `None` en fin de flux
    fn next_byte(&mut self) -> Result<Option<u8>, DisasmError>;
}

/// Curseur sur une source `Read`
///
/// La position est relative au décalage de départ : les octets sautés par
/// [`ByteCursor::skip`] ne sont jamais adressés.
pub struct ByteCursor<R: Read> {
    bytes: Bytes<R>,
    position: u64,
    exhausted: bool,
}

impl<R: Read> ByteCursor<R> {
    /// Crée un curseur positionné au début de la source
    pub fn new(reader: R) -> Self {
        Self {
            bytes: reader.bytes(),
            position: 0,
            exhausted: false,
        }
    }

    /// Consomme et ignore jusqu'à `count` octets; renvoie le nombre sauté
    pub fn skip(&mut self, count: u64) -> Result<u64, DisasmError> {
        let mut skipped = 0;
        while skipped < count {
            if self.pull()?.is_none() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Nombre d'octets lus depuis le décalage de départ
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Vrai une fois que la source a signalé sa fin
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn pull(&mut self) -> Result<Option<u8>, DisasmError> {
        if self.exhausted {
            return Ok(None);
        }
        match self.bytes.next() {
            Some(byte) => Ok(Some(byte?)),
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}

impl<R: Read> ByteSource for ByteCursor<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, DisasmError> {
        let byte = self.pull()?;
        if byte.is_some() {
            self.position += 1;
        }
        Ok(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_reads_until_end() {
        let data = [0x10u8, 0x20];
        let mut cursor = ByteCursor::new(&data[..]);

        assert_eq!(cursor.next_byte().unwrap(), Some(0x10));
        assert_eq!(cursor.next_byte().unwrap(), Some(0x20));
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.next_byte().unwrap(), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next_byte().unwrap(), None);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_skip_is_not_addressed() {
        let data = [0xAAu8, 0xBB, 0xCC];
        let mut cursor = ByteCursor::new(&data[..]);

        assert_eq!(cursor.skip(2).unwrap(), 2);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.next_byte().unwrap(), Some(0xCC));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_skip_past_end() {
        let data = [0x00u8];
        let mut cursor = ByteCursor::new(&data[..]);

        assert_eq!(cursor.skip(5).unwrap(), 1);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next_byte().unwrap(), None);
    }
}
