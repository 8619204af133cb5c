use std::{fmt::Display, str::FromStr};
use serde::{Deserialize, Serialize};
use super::IsrError;

/// AiM ISR opcodes that a generated trace may carry.
///
/// Every data opcode here targets a single bank and takes the same operand
/// layout: `operand_size channel_mask bank row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Write a single bank
    #[serde(rename = "WR_SBK", alias = "ISR_WR_SBK")]
    WrSbk,

    /// Read a single bank back to the host
    #[serde(rename = "RD_SBK", alias = "ISR_RD_SBK")]
    RdSbk,

    /// Copy a single bank into the global buffer
    #[serde(rename = "COPY_BKGB", alias = "ISR_COPY_BKGB")]
    CopyBkgb,

    /// Copy the global buffer into a single bank
    #[serde(rename = "COPY_GBBK", alias = "ISR_COPY_GBBK")]
    CopyGbbk,

    /// MAC between a single bank and the global buffer
    #[serde(rename = "MAC_SBK", alias = "ISR_MAC_SBK")]
    MacSbk,

    /// End of commands
    #[serde(rename = "EOC", alias = "ISR_EOC")]
    Eoc,
}

impl Opcode {
    pub const DATA: [Opcode; 5] = [
        Opcode::WrSbk,
        Opcode::RdSbk,
        Opcode::CopyBkgb,
        Opcode::CopyGbbk,
        Opcode::MacSbk,
    ];

    const ISR_PREFIX: &'static str = "ISR_";

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::WrSbk => "WR_SBK",
            Self::RdSbk => "RD_SBK",
            Self::CopyBkgb => "COPY_BKGB",
            Self::CopyGbbk => "COPY_GBBK",
            Self::MacSbk => "MAC_SBK",
            Self::Eoc => "EOC",
        }
    }

    #[inline]
    pub fn is_data(&self) -> bool {
        !matches!(self, Self::Eoc)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = IsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mnemonic = s.strip_prefix(Self::ISR_PREFIX).unwrap_or(s);
        Self::DATA
            .iter()
            .chain(std::iter::once(&Self::Eoc))
            .find(|opcode| opcode.mnemonic() == mnemonic)
            .copied()
            .ok_or_else(|| IsrError::UnknownOpcode(s.to_string()))
    }
}
