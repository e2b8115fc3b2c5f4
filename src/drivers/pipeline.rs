use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use log::{debug, info, warn};
use crate::config::CaptureConfig;
use crate::drivers::parser;
use crate::drivers::source::{LinePoll, LineSource, SerialLineSource};
use crate::drivers::MeasureError;
use crate::recorder::RawLineJournal;
use crate::types::MeasurementSet;
/// Reads lines until told to stop, then turns them into measurements.
///
/// Raising the stop flag is the normal way a capture ends; a transport fault
/// aborts it and drops whatever was buffered (the raw journal, when
/// configured, still has it).
pub struct SerialCapture<S: LineSource> {
    source: S,
    config: CaptureConfig,
    stop: Arc<AtomicBool>,
    journal: Option<RawLineJournal>,
}
impl SerialCapture<SerialLineSource> {
    pub fn open(config: CaptureConfig, stop: Arc<AtomicBool>) -> Result<Self, MeasureError> {
        let source = SerialLineSource::open(&config)?;
        Self::new(source, config, stop)
    }
}
impl<S: LineSource> SerialCapture<S> {
    pub fn new(
        source: S,
        config: CaptureConfig,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, MeasureError> {
        let journal = config
            .raw_log
            .as_deref()
            .map(RawLineJournal::open)
            .transpose()?;
        Ok(Self {
            source,
            config,
            stop,
            journal,
        })
    }
    pub fn run(&mut self) -> Result<MeasurementSet, MeasureError> {
        let lines = self.collect_lines()?;
        let set = parser::parse_lines(&lines)?;
        for (label, m) in set.iter() {
            match m.sample_interval_ms() {
                Some(interval) => debug!(
                    "{label}: {} samples over {} ms ({interval:.3} ms apart)",
                    m.voltages.len(),
                    m.duration_ms()
                ),
                None => debug!("{label}: single sample at {} ms", m.start_time),
            }
        }
        Ok(set)
    }
    /// Waits out the warm-up, then buffers every line after the discarded
    /// prefix until the stop flag is raised or the source closes. A stop
    /// request that arrives before reading starts is reported as
    /// [`MeasureError::Interrupted`] so callers do not save an empty session.
    pub fn collect_lines(&mut self) -> Result<Vec<String>, MeasureError> {
        if !self.config.warmup.is_zero() {
            info!(
                "waiting {:.1}s for the device to settle",
                self.config.warmup.as_secs_f32()
            );
            thread::sleep(self.config.warmup);
        }
        if self.stop.load(Ordering::SeqCst) {
            return Err(MeasureError::Interrupted);
        }
        info!("capturing; press Ctrl+C to finish");
        let mut lines = Vec::new();
        let mut discarded = 0usize;
        while !self.stop.load(Ordering::SeqCst) {
            let line = match self.source.poll_line()? {
                LinePoll::Line(line) => line,
                LinePoll::Idle => continue,
                LinePoll::Closed => {
                    warn!("transport closed; ending capture");
                    break;
                }
            };
            if let Some(journal) = &mut self.journal {
                journal.write_line(&line)?;
            }
            if discarded < self.config.discard_leading_lines {
                discarded += 1;
                info!("discarding line {discarded} (will be removed)");
                debug!("{line:?}");
                continue;
            }
            info!("read {}", lines.len() + 1);
            debug!("{line:?}");
            lines.push(line);
        }
        info!("capture finished with {} line(s)", lines.len());
        if let Some(journal) = &mut self.journal {
            journal.close()?;
        }
        Ok(lines)
    }
}
