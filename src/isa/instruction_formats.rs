//! Familles d'instructions du Y86-64
//!
//! Chaque famille partage la même disposition d'opérandes et une longueur
//! fixe. Le premier octet (ou son quartet haut) sélectionne la famille.

use super::instructions::{ArithOp, Condition};

/// Familles d'instructions indexées par le premier octet
///
/// +--------+------+--------------------------------------+
/// | opcode | fn   | octets suivants                      |
/// +--------+------+--------------------------------------+
/// |  0..B  | 0..6 | 0, 1 (rA:rB), 8 (valeur) ou 9 (rA:rB |
/// |        |      | puis valeur)                         |
/// +--------+------+--------------------------------------+
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// 0x00
    Halt,
    /// 0x10
    Nop,
    /// 0x20-0x26, rrmovq (condition toujours vraie) ou cmovXX rA, rB
    ConditionalMove(Condition),
    /// 0x30, irmovq V, rB
    ImmediateMove,
    /// 0x40, rmmovq rA, D(rB)
    StoreMemory,
    /// 0x50, mrmovq D(rB), rA
    LoadMemory,
    /// 0x60-0x66, OPq rA, rB
    Arithmetic(ArithOp),
    /// 0x70-0x76, jXX Dest
    Jump(Condition),
    /// 0x80, call Dest
    Call,
    /// 0x90
    Return,
    /// 0xA0, pushq rA
    Push,
    /// 0xB0, popq rA
    Pop,
    /// Tout autre octet : données brutes
    Data,
}

impl Family {
    /// Table de correspondance opcode -> famille
    pub fn from_opcode(opcode: u8) -> Self {
        let function = opcode & 0x0F;
        match opcode {
            0x00 => Family::Halt,
            0x10 => Family::Nop,
            0x20..=0x26 => Condition::from_nibble(function)
                .map(Family::ConditionalMove)
                .unwrap_or(Family::Data),
            0x30 => Family::ImmediateMove,
            0x40 => Family::StoreMemory,
            0x50 => Family::LoadMemory,
            0x60..=0x66 => ArithOp::from_nibble(function)
                .map(Family::Arithmetic)
                .unwrap_or(Family::Data),
            0x70..=0x76 => Condition::from_nibble(function)
                .map(Family::Jump)
                .unwrap_or(Family::Data),
            0x80 => Family::Call,
            0x90 => Family::Return,
            0xA0 => Family::Push,
            0xB0 => Family::Pop,
            _ => Family::Data,
        }
    }

    /// Nombre d'octets lus après l'opcode pour une instruction complète
    pub fn extra_bytes(self) -> usize {
        match self {
            Family::Halt | Family::Nop | Family::Return | Family::Data => 0,
            Family::ConditionalMove(_)
            | Family::Arithmetic(_)
            | Family::Push
            | Family::Pop => 1,
            Family::Jump(_) | Family::Call => 8,
            Family::ImmediateMove | Family::StoreMemory | Family::LoadMemory => 9,
        }
    }

    /// Taille totale d'une instruction de cette famille
    pub fn instruction_size(self) -> usize {
        1 + self.extra_bytes()
    }
}
