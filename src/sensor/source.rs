use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use crossbeam_channel::Receiver;

use super::trace::parse_trace_line;
use super::SensorEvent;

pub trait SensorSource {
    /// Next reading, or `None` once the source is exhausted or disconnected
    fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>>;
}

/// Readings pushed by a live sensor callback thread
pub struct ChannelSource {
    rx: Receiver<SensorEvent>,
    received: u64,
}

impl ChannelSource {
    pub fn new(rx: Receiver<SensorEvent>) -> Self {
        Self { rx, received: 0 }
    }

    /// Readings delivered so far
    pub fn received(&self) -> u64 {
        self.received
    }
}

impl SensorSource for ChannelSource {
    fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>> {
        match self.rx.recv() {
            Ok(event) => {
                self.received += 1;
                Ok(Some(event))
            }
            Err(_) => {
                if self.received == 0 {
                    log::warn!("Orientation sensor unavailable, cannot monitor orientation changes");
                }
                Ok(None)
            }
        }
    }
}

/// Readings replayed from a recorded trace
pub struct TraceSource<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
}

impl TraceSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open trace {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl TraceSource<BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> TraceSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> SensorSource for TraceSource<R> {
    fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if let Some(event) = parse_trace_line(&self.line, self.line_number)? {
                return Ok(Some(event));
            }
        }
    }
}
