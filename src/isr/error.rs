#[derive(Debug, thiserror::Error)]
pub enum IsrError {
    #[error("unknown aim opcode '{0}'")]
    UnknownOpcode(String),

    #[error("channel {0} out of range, expect less than {1}")]
    ChannelOutOfRange(usize, usize),

    #[error("channel count {0} out of range, expect 1..={1}")]
    ChannelCountOutOfRange(usize, usize),

    #[error("invalid channel mask '{0}'")]
    InvalidChannelMask(String),
}
