use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};
use log::debug;
use serialport::SerialPort;
use crate::config::CaptureConfig;
use crate::drivers::MeasureError;
/// Result of one attempt to read a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinePoll {
    /// A complete line, terminator included.
    Line(String),
    /// Nothing complete arrived within the read timeout.
    Idle,
    /// The transport has no more data.
    Closed,
}
/// Trait representing something that yields raw text lines on demand.
pub trait LineSource {
    fn poll_line(&mut self) -> Result<LinePoll, MeasureError>;
}
/// Splits a buffered byte stream into lines. A read timeout is an idle tick,
/// not a fault, and keeps the bytes of an unfinished line for the next poll.
pub struct BufLineSource<R: BufRead> {
    reader: R,
    // Bytes of a line that was cut off by a read timeout.
    pending: Vec<u8>,
}
impl<R: BufRead> BufLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }
}
/// Line reader on top of a serial port. Opening the port resets most
/// Arduino-style boards.
pub type SerialLineSource = BufLineSource<BufReader<Box<dyn SerialPort>>>;
impl SerialLineSource {
    pub fn open(config: &CaptureConfig) -> Result<Self, MeasureError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|err| {
                MeasureError::Transport(format!(
                    "failed to open serial port '{}' at {} baud: {err}",
                    config.port, config.baud_rate
                ))
            })?;
        debug!(
            "serial port '{}' opened at {} baud",
            config.port, config.baud_rate
        );
        Ok(Self::new(BufReader::new(port)))
    }
}
impl<R: BufRead> LineSource for BufLineSource<R> {
    fn poll_line(&mut self) -> Result<LinePoll, MeasureError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Ok(LinePoll::Closed),
            // Either a full line or EOF in the middle of one.
            Ok(_) => {
                let bytes = std::mem::take(&mut self.pending);
                Ok(LinePoll::Line(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(LinePoll::Idle),
            Err(err) => Err(MeasureError::Transport(err.to_string())),
        }
    }
}
/// In-memory source useful for tests and replaying captured text.
pub struct ManualSource {
    queue: VecDeque<Result<LinePoll, MeasureError>>,
}
impl ManualSource {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            queue: lines
                .into_iter()
                .map(|line| Ok(LinePoll::Line(line.into())))
                .collect(),
        }
    }
    /// Queues an arbitrary poll result, e.g. an idle tick or a fault.
    #[cfg(test)]
    pub fn then(mut self, poll: Result<LinePoll, MeasureError>) -> Self {
        self.queue.push_back(poll);
        self
    }
}
impl LineSource for ManualSource {
    fn poll_line(&mut self) -> Result<LinePoll, MeasureError> {
        self.queue.pop_front().unwrap_or(Ok(LinePoll::Closed))
    }
}
