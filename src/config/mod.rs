mod error;
pub use error::*;

use std::path::{Path, PathBuf};
use derive_builder::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::{
    isr::{ChannelMask, IsrError, Opcode, MAX_BANK_COUNT, MAX_CHANNEL_COUNT, MAX_OPERAND_SIZE},
    ErrorContext, TraceResult
};

pub const DEFAULT_OUTPUT: &str = "trace_test.txt";
pub const DEFAULT_ROW_COUNT: u32 = 16;
pub const DEFAULT_BURST_COUNT: u32 = 64;

/// Banks interleaved across the four bank groups: consecutive requests hit
/// different groups, and each group is visited in ascending bank order.
pub const DEFAULT_BANK_ORDER: [u16; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];

/// How each traversal leaf selects channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    /// One request per leaf, sent to every channel in `mask`
    Broadcast { mask: ChannelMask },
    /// One request per channel per leaf, channel loop innermost
    PerChannel { channel_count: usize },
}

impl ChannelMode {
    /// Channel masks visited by the innermost loop, in order
    pub fn masks(&self) -> Result<Vec<ChannelMask>, IsrError> {
        match self {
            Self::Broadcast { mask } => Ok(vec![*mask]),
            Self::PerChannel { channel_count } => {
                if *channel_count > MAX_CHANNEL_COUNT {
                    return Err(IsrError::ChannelCountOutOfRange(*channel_count, MAX_CHANNEL_COUNT));
                }
                (0..*channel_count).map(ChannelMask::single).collect()
            }
        }
    }

    /// Requests emitted per traversal leaf
    pub fn requests_per_leaf(&self) -> usize {
        match self {
            Self::Broadcast { .. } => 1,
            Self::PerChannel { channel_count } => *channel_count,
        }
    }
}

impl Default for ChannelMode {
    fn default() -> Self {
        Self::Broadcast { mask: ChannelMask::ALL }
    }
}

/// Nesting of the traversal loops, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopOrder {
    /// row > burst > bank > channel
    #[default]
    RowColumnBank,
    /// burst group > row > bank > channel, with `burst_count / operand_size` groups
    BurstGroup,
}

/// Everything that shapes a generated trace.
///
/// Every field is optional in the JSON form and falls back to the
/// defaults below, which reproduce the reference write trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(pattern = "owned", setter(into), default)]
pub struct TraceConfig {
    pub output: PathBuf,
    pub row_count: u32,
    pub burst_count: u32,
    pub bank_order: Vec<u16>,
    pub channel_mode: ChannelMode,
    pub loop_order: LoopOrder,
    pub opcode: Opcode,
    pub operand_size: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.into(),
            row_count: DEFAULT_ROW_COUNT,
            burst_count: DEFAULT_BURST_COUNT,
            bank_order: DEFAULT_BANK_ORDER.to_vec(),
            channel_mode: ChannelMode::default(),
            loop_order: LoopOrder::default(),
            opcode: Opcode::WrSbk,
            operand_size: 0,
        }
    }
}

impl TraceConfig {
    pub fn builder() -> TraceConfigBuilder {
        TraceConfigBuilder::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> TraceResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("read config file {:?}", path))?;
        let config: TraceConfig = serde_json::from_str(&content).context("parse config file")?;
        debug!("load trace config from {:?}: {:?}", path, config);
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TraceResult<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("write config file {:?}", path))?;
        info!("save trace config to {:?}", path);
        Ok(())
    }

    /// Check every hardware and traversal bound before anything is written
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operand_size > MAX_OPERAND_SIZE {
            return Err(ConfigError::OperandSizeOverflow(self.operand_size, MAX_OPERAND_SIZE));
        }
        if !self.opcode.is_data() {
            return Err(ConfigError::NonDataOpcode(self.opcode));
        }

        if self.row_count == 0 {
            return Err(ConfigError::ZeroRowCount);
        }
        // row address is a signed 32-bit field downstream
        if self.row_count > i32::MAX as u32 {
            return Err(ConfigError::RowCountOverflow(self.row_count));
        }
        if self.burst_count == 0 {
            return Err(ConfigError::ZeroBurstCount);
        }

        if self.bank_order.is_empty() {
            return Err(ConfigError::EmptyBankOrder);
        }
        if let Some(&bank) = self.bank_order.iter().find(|&&bank| bank as usize >= MAX_BANK_COUNT) {
            return Err(ConfigError::BankOutOfRange(bank, MAX_BANK_COUNT));
        }
        if let Some(&bank) = self.bank_order.iter().duplicates().next() {
            return Err(ConfigError::DuplicateBank(bank));
        }

        match self.channel_mode {
            ChannelMode::Broadcast { mask } if mask.is_empty() => return Err(ConfigError::EmptyChannelMask),
            ChannelMode::PerChannel { channel_count } if channel_count == 0 || channel_count > MAX_CHANNEL_COUNT => {
                return Err(ConfigError::ChannelCountOutOfRange(channel_count, MAX_CHANNEL_COUNT));
            }
            _ => {}
        }

        if self.loop_order == LoopOrder::BurstGroup {
            if self.operand_size == 0 {
                return Err(ConfigError::ZeroOperandSizeInBurstGroup);
            }
            if self.burst_count % self.operand_size != 0 {
                return Err(ConfigError::UnalignedBurstGroup(self.burst_count, self.operand_size));
            }
        }

        if self.output.file_name().is_none() {
            return Err(ConfigError::InvalidOutputPath(self.output.clone()));
        }

        if self.data_line_count().is_none() {
            return Err(ConfigError::TraceTooLarge);
        }

        Ok(())
    }

    /// Passes of the outermost loop in `LoopOrder::BurstGroup`
    pub fn burst_groups(&self) -> u32 {
        match self.operand_size {
            0 => 0,
            size => self.burst_count / size,
        }
    }

    /// Data lines the configured traversal emits, sentinel excluded.
    /// `None` when the count does not fit in a `u64`.
    pub fn data_line_count(&self) -> Option<u64> {
        let outer = match self.loop_order {
            LoopOrder::RowColumnBank => self.burst_count as u64,
            LoopOrder::BurstGroup => self.burst_groups() as u64,
        };
        outer
            .checked_mul(self.row_count as u64)?
            .checked_mul(self.bank_order.len() as u64)?
            .checked_mul(self.channel_mode.requests_per_leaf() as u64)
    }
}
