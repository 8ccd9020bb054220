use anyhow::{Context as _, Result};
use edca_core::Report;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

/// The output file of a run.
///
/// Opened once, in append mode, when the run starts. [`ReportSink::finish`]
/// flushes and closes it; dropping the sink on an error path closes it
/// too.
pub struct ReportSink {
    path: PathBuf,
    out: BufWriter<File>,
}

impl ReportSink {
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open output file {}", path.display()))?;

        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, report: &Report) -> Result<()> {
        report
            .write_to(&mut self.out)
            .with_context(|| format!("Failed to write rows to {}", self.path.display()))
    }

    pub fn finish(mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        self.out
            .get_ref()
            .sync_all()
            .with_context(|| format!("Failed to sync {}", self.path.display()))
    }
}
