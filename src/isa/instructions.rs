//! Instructions du Y86-64 et tables de mnémoniques

use super::registers::Register;
use crate::listing::formatter::hex_literal;

/// Opérations arithmétiques et logiques (famille OPq, 0x60-0x66)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    And,
    Xor,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    /// Sous-opcode (quartet bas du premier octet) vers opération
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x0 => Some(ArithOp::Add),
            0x1 => Some(ArithOp::Sub),
            0x2 => Some(ArithOp::And),
            0x3 => Some(ArithOp::Xor),
            0x4 => Some(ArithOp::Mul),
            0x5 => Some(ArithOp::Div),
            0x6 => Some(ArithOp::Mod),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::Add => "addq",
            ArithOp::Sub => "subq",
            ArithOp::And => "andq",
            ArithOp::Xor => "xorq",
            ArithOp::Mul => "mulq",
            ArithOp::Div => "divq",
            ArithOp::Mod => "modq",
        }
    }
}

/// Conditions partagées par les déplacements conditionnels et les sauts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    LessEqual,
    Less,
    Equal,
    NotEqual,
    GreaterEqual,
    Greater,
}

impl Condition {
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x0 => Some(Condition::Always),
            0x1 => Some(Condition::LessEqual),
            0x2 => Some(Condition::Less),
            0x3 => Some(Condition::Equal),
            0x4 => Some(Condition::NotEqual),
            0x5 => Some(Condition::GreaterEqual),
            0x6 => Some(Condition::Greater),
            _ => None,
        }
    }

    /// Mnémonique de saut (famille jXX)
    pub fn jump_mnemonic(self) -> &'static str {
        match self {
            Condition::Always => "jmp",
            Condition::LessEqual => "jle",
            Condition::Less => "jl",
            Condition::Equal => "je",
            Condition::NotEqual => "jne",
            Condition::GreaterEqual => "jge",
            Condition::Greater => "jg",
        }
    }

    /// Mnémonique de déplacement conditionnel; sans condition c'est un rrmovq
    pub fn cmov_mnemonic(self) -> &'static str {
        match self {
            Condition::Always => "rrmovq",
            Condition::LessEqual => "cmovle",
            Condition::Less => "cmovl",
            Condition::Equal => "cmove",
            Condition::NotEqual => "cmovne",
            Condition::GreaterEqual => "cmovge",
            Condition::Greater => "cmovg",
        }
    }
}

/// Instruction Y86-64 décodée et validée
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // Instructions sans opérande
    Halt,
    Nop,
    Return,

    // Transferts registre/registre, immédiat et mémoire
    ConditionalMove { condition: Condition, src: Register, dst: Register },
    ImmediateMove { immediate: u64, dst: Register },
    StoreMemory { src: Register, displacement: u64, base: Register },
    LoadMemory { displacement: u64, base: Register, dst: Register },

    // Arithmétique
    Arithmetic { op: ArithOp, a: Register, b: Register },

    // Branchements
    Jump { condition: Condition, destination: u64 },
    Call { destination: u64 },

    // Pile
    Push { src: Register },
    Pop { dst: Register },
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Halt => "halt",
            Instruction::Nop => "nop",
            Instruction::Return => "ret",
            Instruction::ConditionalMove { condition, .. } => condition.cmov_mnemonic(),
            Instruction::ImmediateMove { .. } => "irmovq",
            Instruction::StoreMemory { .. } => "rmmovq",
            Instruction::LoadMemory { .. } => "mrmovq",
            Instruction::Arithmetic { op, .. } => op.mnemonic(),
            Instruction::Jump { condition, .. } => condition.jump_mnemonic(),
            Instruction::Call { .. } => "call",
            Instruction::Push { .. } => "pushq",
            Instruction::Pop { .. } => "popq",
        }
    }

    /// Textes des opérandes dans l'ordre d'affichage
    pub fn operands(&self) -> Vec<String> {
        match self {
            Instruction::Halt | Instruction::Nop | Instruction::Return => Vec::new(),
            Instruction::ConditionalMove { src, dst, .. } => {
                vec![src.name().to_string(), dst.name().to_string()]
            }
            Instruction::ImmediateMove { immediate, dst } => {
                vec![format!("${}", hex_literal(*immediate)), dst.name().to_string()]
            }
            Instruction::StoreMemory {
                src,
                displacement,
                base,
            } => vec![
                src.name().to_string(),
                format!("{}({})", hex_literal(*displacement), base),
            ],
            Instruction::LoadMemory {
                displacement,
                base,
                dst,
            } => vec![
                format!("{}({})", hex_literal(*displacement), base),
                dst.name().to_string(),
            ],
            Instruction::Arithmetic { a, b, .. } => vec![a.name().to_string(), b.name().to_string()],
            Instruction::Jump { destination, .. } | Instruction::Call { destination } => {
                vec![hex_literal(*destination)]
            }
            Instruction::Push { src } => vec![src.name().to_string()],
            Instruction::Pop { dst } => vec![dst.name().to_string()],
        }
    }

    /// Taille de l'encodage en octets
    pub fn size(&self) -> usize {
        match self {
            Instruction::Halt | Instruction::Nop | Instruction::Return => 1,
            Instruction::ConditionalMove { .. }
            | Instruction::Arithmetic { .. }
            | Instruction::Push { .. }
            | Instruction::Pop { .. } => 2,
            Instruction::Jump { .. } | Instruction::Call { .. } => 9,
            Instruction::ImmediateMove { .. }
            | Instruction::StoreMemory { .. }
            | Instruction::LoadMemory { .. } => 10,
        }
    }
}
