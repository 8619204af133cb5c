use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::{isr::Instruction, TraceResult};
use super::TraceWriteError;

/// Line writer for one trace. Refuses anything after `EOC`, and refuses to
/// close before it.
pub struct TraceWriter<W: Write> {
    out: W,
    data_lines: u64,
    terminated: bool,
}

impl TraceWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> TraceResult<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, data_lines: 0, terminated: false }
    }

    pub fn write_instruction(&mut self, instruction: &Instruction) -> TraceResult<()> {
        if self.terminated {
            return Err(TraceWriteError::WriteAfterEoc)?;
        }

        writeln!(self.out, "{}", instruction)?;
        match instruction {
            Instruction::Data(_) => self.data_lines += 1,
            Instruction::Eoc => self.terminated = true,
        }

        Ok(())
    }

    pub fn write_eoc(&mut self) -> TraceResult<()> {
        self.write_instruction(&Instruction::Eoc)
    }

    pub fn data_lines(&self) -> u64 {
        self.data_lines
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Flush and hand back the sink
    pub fn close(mut self) -> TraceResult<W> {
        if !self.terminated {
            return Err(TraceWriteError::MissingEoc)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
