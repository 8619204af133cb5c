use itertools::iproduct;
use tracing::{debug, warn};
use crate::{
    config::{ConfigError, LoopOrder, TraceConfig},
    isr::{bank_group, ChannelMask, Instruction},
    TraceResult
};

/// Every instruction of a trace in emission order, `EOC` last.
///
/// Loop nesting follows the configured `LoopOrder`:
///
/// - `RowColumnBank`: the row stays open for all of its bursts, and the
///   burst loop sits outside the bank loop so back to back requests to one
///   bank are spaced by the short same-bank column delay.
/// - `BurstGroup`: all rows are swept once per group of `operand_size`
///   bursts.
///
/// In both orders banks follow `bank_order` and the channel loop is
/// innermost, so no channel waits on another channel's queue.
pub struct Traversal<'a> {
    inner: Box<dyn Iterator<Item = Instruction> + 'a>,
    data_len: u64,
}

impl<'a> Traversal<'a> {
    pub fn new(config: &'a TraceConfig) -> TraceResult<Self> {
        config.validate()?;
        let data_len = config.data_line_count().ok_or(ConfigError::TraceTooLarge)?;
        let masks = config.channel_mode.masks()?;
        let banks = config.bank_order.iter().copied();

        let opcode = config.opcode;
        let operand_size = config.operand_size;
        let leaf = move |bank: u16, row: u32, mask: ChannelMask| {
            Instruction::data(opcode, operand_size, mask, bank, row)
        };

        debug!(
            "traverse {:?}: {} rows, {} bursts, {} banks, {} channel masks",
            config.loop_order, config.row_count, config.burst_count, config.bank_order.len(), masks.len()
        );

        let groups: Vec<usize> = config.bank_order.iter().map(|&bank| bank_group(bank)).collect();
        debug!("bank group spread: {:?}", groups);
        if let Some(pair) = config.bank_order.windows(2).find(|pair| bank_group(pair[0]) == bank_group(pair[1])) {
            warn!("banks {} and {} are back to back in the same bank group", pair[0], pair[1]);
        }

        let data: Box<dyn Iterator<Item = Instruction> + 'a> = match config.loop_order {
            LoopOrder::RowColumnBank => Box::new(
                iproduct!(0..config.row_count, 0..config.burst_count, banks, masks)
                    .map(move |(row, _burst, bank, mask)| leaf(bank, row, mask)),
            ),
            LoopOrder::BurstGroup => Box::new(
                iproduct!(0..config.burst_groups(), 0..config.row_count, banks, masks)
                    .map(move |(_group, row, bank, mask)| leaf(bank, row, mask)),
            ),
        };

        Ok(Self {
            inner: Box::new(data.chain(std::iter::once(Instruction::Eoc))),
            data_len,
        })
    }

    /// Data instructions this traversal yields before `EOC`
    pub fn data_len(&self) -> u64 {
        self.data_len
    }
}

impl Iterator for Traversal<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
