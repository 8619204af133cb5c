use std::path::Path;
use aimtrace::{
    config::{ChannelMode, ConfigError, LoopOrder, TraceConfig, DEFAULT_BANK_ORDER},
    isr::{ChannelMask, Opcode, MAX_BANK_COUNT},
    trace::{self, TraceSummary},
    TraceError, TraceResult,
};
use tempfile::TempDir;

/// One parsed data line: (opcode, operand size, mask, bank, row)
type Fields = (String, u32, u32, u16, u32);

fn emit_to_string(config: &TraceConfig) -> TraceResult<String> {
    let mut out = Vec::new();
    trace::emit(config, &mut out)?;
    Ok(String::from_utf8(out).expect("trace is ascii"))
}

fn parse_data_line(line: &str) -> Fields {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(tokens.len(), 6, "malformed line '{line}'");
    assert_eq!(tokens[0], "AiM");
    let mask = tokens[3].strip_prefix("0x").expect("mask is 0x prefixed");
    (
        tokens[1].to_string(),
        tokens[2].parse().unwrap(),
        u32::from_str_radix(mask, 16).unwrap(),
        tokens[4].parse().unwrap(),
        tokens[5].parse().unwrap(),
    )
}

fn data_lines(content: &str) -> Vec<Fields> {
    let lines: Vec<&str> = content.lines().collect();
    let (eoc, data) = lines.split_last().expect("trace is never empty");
    assert_eq!(*eoc, "AiM EOC");
    data.iter().map(|line| parse_data_line(line)).collect()
}

#[test]
fn example_scenario_is_bit_exact() -> TraceResult<()> {
    let config = TraceConfig::builder()
        .row_count(2u32)
        .burst_count(1u32)
        .bank_order(vec![0u16, 4])
        .opcode(Opcode::WrSbk)
        .operand_size(0u32)
        .channel_mode(ChannelMode::Broadcast { mask: ChannelMask::new(0xFFFFFFFF) })
        .build()
        .map_err(ConfigError::from)?;

    let content = emit_to_string(&config)?;
    assert_eq!(
        content,
        "AiM WR_SBK 0 0xffffffff 0 0\n\
         AiM WR_SBK 0 0xffffffff 4 0\n\
         AiM WR_SBK 0 0xffffffff 0 1\n\
         AiM WR_SBK 0 0xffffffff 4 1\n\
         AiM EOC\n"
    );
    Ok(())
}

#[test]
fn default_trace_shape() -> TraceResult<()> {
    let config = TraceConfig::default();
    let content = emit_to_string(&config)?;
    let lines = data_lines(&content);

    assert_eq!(lines.len(), 16 * 64 * 16);
    assert_eq!(content.lines().count(), lines.len() + 1);
    assert_eq!(content.lines().filter(|l| *l == "AiM EOC").count(), 1);
    assert!(content.ends_with("AiM EOC\n"));

    for (opcode, operand_size, mask, bank, row) in lines.iter() {
        assert_eq!(opcode, "WR_SBK");
        assert_eq!(*operand_size, 0);
        assert_eq!(*mask, u32::MAX);
        assert!((*bank as usize) < MAX_BANK_COUNT);
        assert!(*row < config.row_count);
    }
    Ok(())
}

#[test]
fn bank_order_repeats_per_row() -> TraceResult<()> {
    let config = TraceConfig::default();
    let lines = data_lines(&emit_to_string(&config)?);

    for row in 0..config.row_count {
        let banks: Vec<u16> = lines.iter().filter(|l| l.4 == row).map(|l| l.3).collect();
        let expect: Vec<u16> = DEFAULT_BANK_ORDER
            .iter()
            .copied()
            .cycle()
            .take(DEFAULT_BANK_ORDER.len() * config.burst_count as usize)
            .collect();
        assert_eq!(banks, expect, "bank sequence of row {row}");
    }
    Ok(())
}

#[test]
fn rows_are_major() -> TraceResult<()> {
    let config = TraceConfig::builder()
        .row_count(5u32)
        .burst_count(3u32)
        .build()
        .map_err(ConfigError::from)?;
    let rows: Vec<u32> = data_lines(&emit_to_string(&config)?).iter().map(|l| l.4).collect();

    assert!(rows.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(rows.first(), Some(&0));
    assert_eq!(rows.last(), Some(&4));
    Ok(())
}

#[test]
fn per_channel_mode_walks_channels_innermost() -> TraceResult<()> {
    let config = TraceConfig::builder()
        .row_count(1u32)
        .burst_count(2u32)
        .bank_order(vec![3u16, 7])
        .channel_mode(ChannelMode::PerChannel { channel_count: 4 })
        .opcode(Opcode::RdSbk)
        .operand_size(8u32)
        .build()
        .map_err(ConfigError::from)?;
    let content = emit_to_string(&config)?;
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 2 * 2 * 4 + 1);
    assert_eq!(&lines[..5], &[
        "AiM RD_SBK 8 0x1 3 0",
        "AiM RD_SBK 8 0x2 3 0",
        "AiM RD_SBK 8 0x4 3 0",
        "AiM RD_SBK 8 0x8 3 0",
        "AiM RD_SBK 8 0x1 7 0",
    ]);
    Ok(())
}

#[test]
fn burst_group_mode_sweeps_rows_per_group() -> TraceResult<()> {
    let config = TraceConfig::builder()
        .row_count(2u32)
        .burst_count(64u32)
        .bank_order(vec![0u16, 4])
        .loop_order(LoopOrder::BurstGroup)
        .opcode(Opcode::RdSbk)
        .operand_size(16u32)
        .build()
        .map_err(ConfigError::from)?;
    let lines = data_lines(&emit_to_string(&config)?);

    assert_eq!(lines.len(), 4 * 2 * 2);
    let rows: Vec<u32> = lines.iter().map(|l| l.4).collect();
    assert_eq!(rows, [0u32, 0, 1, 1].repeat(4));
    assert!(lines.iter().all(|l| l.0 == "RD_SBK" && l.1 == 16));
    Ok(())
}

#[test]
fn write_trace_is_deterministic() -> TraceResult<()> {
    let dir = TempDir::new()?;
    let first = TraceConfig::builder()
        .output(dir.path().join("first.txt"))
        .build()
        .map_err(ConfigError::from)?;
    let mut second = first.clone();
    second.output = dir.path().join("second.txt");

    let summary = trace::write_trace(&first)?;
    trace::write_trace(&second)?;

    assert_eq!(summary, TraceSummary::new(16 * 64 * 16, Some(first.output.clone())));
    assert_eq!(std::fs::read(&first.output)?, std::fs::read(&second.output)?);
    assert_eq!(std::fs::read_to_string(&first.output)?, emit_to_string(&first)?);
    Ok(())
}

#[test]
fn write_trace_creates_parent_and_leaves_no_partial() -> TraceResult<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("nested").join("trace.txt");
    let config = TraceConfig::builder()
        .output(output.clone())
        .row_count(1u32)
        .burst_count(1u32)
        .build()
        .map_err(ConfigError::from)?;

    trace::write_trace(&config)?;

    assert!(output.exists());
    assert!(!Path::new(&format!("{}.partial", output.display())).exists());
    let entries = std::fs::read_dir(output.parent().unwrap())?.count();
    assert_eq!(entries, 1);
    Ok(())
}

#[test]
fn invalid_config_touches_nothing() -> TraceResult<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("trace.txt");
    std::fs::write(&output, "previous")?;

    let config = TraceConfig::builder()
        .output(output.clone())
        .operand_size(33u32)
        .build()
        .map_err(ConfigError::from)?;

    let res = trace::write_trace(&config);
    assert!(matches!(res, Err(TraceError::Config(ConfigError::OperandSizeOverflow(33, 32)))));
    assert_eq!(std::fs::read_to_string(&output)?, "previous");
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn failed_write_keeps_previous_output() -> TraceResult<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("trace.txt");
    std::fs::write(&output, "previous")?;
    // a directory squatting on the partial path makes the create fail
    std::fs::create_dir(dir.path().join("trace.txt.partial"))?;

    let config = TraceConfig::builder()
        .output(output.clone())
        .build()
        .map_err(ConfigError::from)?;

    assert!(trace::write_trace(&config).is_err());
    assert_eq!(std::fs::read_to_string(&output)?, "previous");
    Ok(())
}

#[test]
fn failed_publish_removes_partial() -> TraceResult<()> {
    let dir = TempDir::new()?;
    // the trace is fully written to the partial file, then the rename onto
    // a non-empty directory fails
    let output = dir.path().join("trace");
    std::fs::create_dir(&output)?;
    std::fs::write(output.join("keep.txt"), "previous")?;

    let config = TraceConfig::builder()
        .output(output.clone())
        .row_count(1u32)
        .burst_count(2u32)
        .build()
        .map_err(ConfigError::from)?;

    let err = trace::write_trace(&config).unwrap_err();
    assert!(err.to_string().starts_with("publish trace"));
    assert!(!dir.path().join("trace.partial").exists());
    assert!(output.is_dir());
    assert_eq!(std::fs::read_to_string(output.join("keep.txt"))?, "previous");
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}
