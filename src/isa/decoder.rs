//! Décodeurs par famille d'instructions Y86-64
//!
//! Chaque décodeur lit les octets dont il a besoin, valide les champs
//! registres et renvoie un [`DecodeOutcome`]. Il n'émet jamais de données
//! brutes lui-même : les octets déjà consommés sont rendus à l'appelant.

use super::instruction_formats::Family;
use super::instructions::Instruction;
use super::registers::{is_no_register, split_register_byte, Register};
use crate::error::DisasmError;
use crate::listing::cursor::ByteSource;

/// Résultat d'un décodage structuré
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Instruction valide et ses octets d'encodage
    Decoded {
        instruction: Instruction,
        encoding: Vec<u8>,
    },

    /// Un champ d'opérande est invalide, octets consommés jusqu'ici
    ValidationFailed(Vec<u8>),

    /// Fin du flux au milieu de l'instruction, octets effectivement lus
    Truncated(Vec<u8>),
}

impl DecodeOutcome {
    /// Nombre d'octets consommés dans le flux
    pub fn consumed(&self) -> usize {
        match self {
            DecodeOutcome::Decoded { encoding, .. } => encoding.len(),
            DecodeOutcome::ValidationFailed(bytes) | DecodeOutcome::Truncated(bytes) => bytes.len(),
        }
    }
}

/// Décode l'instruction dont l'opcode vient d'être lu
pub fn decode_instruction<S: ByteSource>(
    opcode: u8,
    source: &mut S,
) -> Result<DecodeOutcome, DisasmError> {
    let family = Family::from_opcode(opcode);
    let mut encoding = Vec::with_capacity(family.instruction_size());
    encoding.push(opcode);

    match family {
        Family::Halt => Ok(decoded(Instruction::Halt, encoding)),
        Family::Nop => Ok(decoded(Instruction::Nop, encoding)),
        Family::Return => Ok(decoded(Instruction::Return, encoding)),
        Family::ConditionalMove(condition) => {
            decode_register_pair(source, encoding, |src, dst| Instruction::ConditionalMove {
                condition,
                src,
                dst,
            })
        }
        Family::Arithmetic(op) => {
            decode_register_pair(source, encoding, |a, b| Instruction::Arithmetic { op, a, b })
        }
        Family::ImmediateMove => decode_immediate_move(source, encoding),
        Family::StoreMemory => {
            decode_memory(source, encoding, |src, base, displacement| {
                Instruction::StoreMemory {
                    src,
                    displacement,
                    base,
                }
            })
        }
        Family::LoadMemory => decode_memory(source, encoding, |dst, base, displacement| {
            Instruction::LoadMemory {
                displacement,
                base,
                dst,
            }
        }),
        Family::Jump(condition) => decode_destination(source, encoding, |destination| {
            Instruction::Jump {
                condition,
                destination,
            }
        }),
        Family::Call => decode_destination(source, encoding, |destination| Instruction::Call {
            destination,
        }),
        Family::Push => decode_single_register(source, encoding, |src| Instruction::Push { src }),
        Family::Pop => decode_single_register(source, encoding, |dst| Instruction::Pop { dst }),
        Family::Data => Ok(DecodeOutcome::ValidationFailed(encoding)),
    }
}

fn decoded(instruction: Instruction, encoding: Vec<u8>) -> DecodeOutcome {
    DecodeOutcome::Decoded {
        instruction,
        encoding,
    }
}

/// Lit l'octet de registres; `None` si le flux est épuisé
fn read_register_byte<S: ByteSource>(
    source: &mut S,
    encoding: &mut Vec<u8>,
) -> Result<Option<(u8, u8)>, DisasmError> {
    match source.next_byte()? {
        Some(byte) => {
            encoding.push(byte);
            Ok(Some(split_register_byte(byte)))
        }
        None => Ok(None),
    }
}

/// Lit une valeur 8 octets little-endian; `None` si le flux s'arrête avant
fn read_quad<S: ByteSource>(
    source: &mut S,
    encoding: &mut Vec<u8>,
) -> Result<Option<u64>, DisasmError> {
    let mut value = [0u8; 8];
    for slot in value.iter_mut() {
        match source.next_byte()? {
            Some(byte) => {
                *slot = byte;
                encoding.push(byte);
            }
            None => return Ok(None),
        }
    }
    Ok(Some(u64::from_le_bytes(value)))
}

/// rrmovq, cmovXX et OPq : deux registres valides
fn decode_register_pair<S, F>(
    source: &mut S,
    mut encoding: Vec<u8>,
    build: F,
) -> Result<DecodeOutcome, DisasmError>
where
    S: ByteSource,
    F: FnOnce(Register, Register) -> Instruction,
{
    let Some((ra, rb)) = read_register_byte(source, &mut encoding)? else {
        return Ok(DecodeOutcome::Truncated(encoding));
    };

    match (Register::from_nibble(ra), Register::from_nibble(rb)) {
        (Some(a), Some(b)) => Ok(decoded(build(a, b), encoding)),
        _ => Ok(DecodeOutcome::ValidationFailed(encoding)),
    }
}

/// irmovq V, rB : quartet haut à 0xF, puis la valeur immédiate
fn decode_immediate_move<S: ByteSource>(
    source: &mut S,
    mut encoding: Vec<u8>,
) -> Result<DecodeOutcome, DisasmError> {
    let Some((ra, rb)) = read_register_byte(source, &mut encoding)? else {
        return Ok(DecodeOutcome::Truncated(encoding));
    };

    let dst = match Register::from_nibble(rb) {
        Some(dst) if is_no_register(ra) => dst,
        _ => return Ok(DecodeOutcome::ValidationFailed(encoding)),
    };

    match read_quad(source, &mut encoding)? {
        Some(immediate) => Ok(decoded(Instruction::ImmediateMove { immediate, dst }, encoding)),
        None => Ok(DecodeOutcome::Truncated(encoding)),
    }
}

/// rmmovq et mrmovq : registre, base, puis déplacement
fn decode_memory<S, F>(
    source: &mut S,
    mut encoding: Vec<u8>,
    build: F,
) -> Result<DecodeOutcome, DisasmError>
where
    S: ByteSource,
    F: FnOnce(Register, Register, u64) -> Instruction,
{
    let Some((ra, rb)) = read_register_byte(source, &mut encoding)? else {
        return Ok(DecodeOutcome::Truncated(encoding));
    };

    let (Some(register), Some(base)) = (Register::from_nibble(ra), Register::from_nibble(rb)) else {
        return Ok(DecodeOutcome::ValidationFailed(encoding));
    };

    match read_quad(source, &mut encoding)? {
        Some(displacement) => Ok(decoded(build(register, base, displacement), encoding)),
        None => Ok(DecodeOutcome::Truncated(encoding)),
    }
}

/// jXX et call : seule la disponibilité des octets est vérifiée
fn decode_destination<S, F>(
    source: &mut S,
    mut encoding: Vec<u8>,
    build: F,
) -> Result<DecodeOutcome, DisasmError>
where
    S: ByteSource,
    F: FnOnce(u64) -> Instruction,
{
    match read_quad(source, &mut encoding)? {
        Some(destination) => Ok(decoded(build(destination), encoding)),
        None => Ok(DecodeOutcome::Truncated(encoding)),
    }
}

/// pushq et popq : registre valide en haut, 0xF en bas
fn decode_single_register<S, F>(
    source: &mut S,
    mut encoding: Vec<u8>,
    build: F,
) -> Result<DecodeOutcome, DisasmError>
where
    S: ByteSource,
    F: FnOnce(Register) -> Instruction,
{
    let Some((ra, rb)) = read_register_byte(source, &mut encoding)? else {
        return Ok(DecodeOutcome::Truncated(encoding));
    };

    match Register::from_nibble(ra) {
        Some(register) if is_no_register(rb) => Ok(decoded(build(register), encoding)),
        _ => Ok(DecodeOutcome::ValidationFailed(encoding)),
    }
}
