use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::info;

/// Copy of one session's raw serial text, flushed line by line so a
/// transport fault cannot take already received data with it. Opening the
/// journal starts it over, so a replay always begins at a device reset.
pub struct RawLineJournal {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    lines_written: usize,
}

impl RawLineJournal {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        info!("journaling raw serial lines to {}", path.display());
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path: path.to_path_buf(),
            lines_written: 0,
        })
    }

    pub fn write_line(&mut self, raw: &str) -> std::io::Result<()> {
        if let Some(w) = &mut self.writer {
            w.write_all(raw.as_bytes())?;
            if !raw.ends_with('\n') {
                w.write_all(b"\n")?;
            }
            w.flush()?;
            self.lines_written += 1;
        }
        Ok(())
    }

    pub fn close(&mut self) -> std::io::Result<()> {
        if let Some(mut w) = self.writer.take() {
            w.flush()?;
            info!(
                "raw journal {} closed after {} line(s)",
                self.path.display(),
                self.lines_written
            );
        }
        Ok(())
    }
}

impl Drop for RawLineJournal {
    fn drop(&mut self) {
        self.close().ok();
    }
}
