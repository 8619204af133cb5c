mod error;
mod traversal;
mod writer;
pub use error::*;
pub use traversal::*;
pub use writer::*;

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::{config::{ConfigError, TraceConfig}, ErrorContext, TraceResult};

const PARTIAL_SUFFIX: &str = "partial";

#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct TraceSummary {
    /// Data lines written, `EOC` excluded
    pub data_lines: u64,
    /// Published file, `None` when emitted into a caller sink
    pub path: Option<PathBuf>,
}

/// Emit the whole trace of `config` into `out`
pub fn emit<W: Write>(config: &TraceConfig, out: W) -> TraceResult<TraceSummary> {
    let mut writer = TraceWriter::new(out);
    emit_into(config, &mut writer)?;
    let data_lines = writer.data_lines();
    writer.close()?;
    Ok(TraceSummary::new(data_lines, None))
}

/// Write the trace of `config` to `config.output`.
///
/// Lines go to a sibling `.partial` file first, which is renamed onto the
/// output only after `EOC` is written and the file is synced. On failure
/// the partial file is removed and an existing output is left as it was.
pub fn write_trace(config: &TraceConfig) -> TraceResult<TraceSummary> {
    config.validate()?;
    let output = config.output.as_path();
    let partial = partial_path(output)?;

    info!("write {} trace to {:?}", config.opcode, output);
    match write_and_publish(config, &partial, output) {
        Ok(data_lines) => {
            info!("wrote {} instructions and EOC to {:?}", data_lines, output);
            Ok(TraceSummary::new(data_lines, Some(output.to_path_buf())))
        }
        Err(err) => {
            match std::fs::remove_file(&partial) {
                Ok(()) => debug!("removed partial trace {:?}", partial),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("can't remove partial trace {:?}: {}", partial, e),
            }
            Err(err)
        }
    }
}

fn emit_into<W: Write>(config: &TraceConfig, writer: &mut TraceWriter<W>) -> TraceResult<()> {
    let traversal = Traversal::new(config)?;
    debug!("emit {} data instructions", traversal.data_len());
    for instruction in traversal {
        writer.write_instruction(&instruction)?;
    }
    Ok(())
}

fn write_and_publish(config: &TraceConfig, partial: &Path, output: &Path) -> TraceResult<u64> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| format!("create output directory {:?}", parent))?;
            info!("created output directory: {:?}", parent);
        }
    }

    let mut writer = TraceWriter::create(partial).with_context(|| format!("create {:?}", partial))?;
    emit_into(config, &mut writer)?;
    let data_lines = writer.data_lines();

    let file = writer.close()?.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(partial, output).with_context(|| format!("publish trace {:?}", output))?;
    Ok(data_lines)
}

fn partial_path(output: &Path) -> Result<PathBuf, ConfigError> {
    let file_name = output
        .file_name()
        .ok_or_else(|| ConfigError::InvalidOutputPath(output.to_path_buf()))?;
    let mut partial = file_name.to_os_string();
    partial.push(".");
    partial.push(PARTIAL_SUFFIX);
    Ok(output.with_file_name(partial))
}
