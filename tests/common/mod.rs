//! Shared utilities for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::{Method, StatusCode};
use httplog::sink::Level;
use httplog::{EventId, LogSink, Payload, Record};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// An owned copy of one emitted record.
#[derive(Clone, Debug)]
pub struct Captured {
    pub level: Level,
    pub event: EventId,
    pub message: String,
    pub method: Option<Method>,
    pub uri: Option<String>,
    pub status: Option<StatusCode>,
    pub elapsed: Option<Duration>,
}

/// A sink that keeps every record at or above `max` verbosity.
#[derive(Clone)]
pub struct CaptureSink {
    max: LevelFilter,
    records: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureSink {
    pub fn new(max: LevelFilter) -> Self {
        Self { max, records: Arc::default() }
    }

    pub fn records(&self) -> Vec<Captured> {
        self.records.lock().unwrap().clone()
    }

    pub fn event_ids(&self) -> Vec<u32> {
        self.records().iter().map(|r| r.event.id).collect()
    }

    /// The rendered message of the first record with event id `id`.
    pub fn message(&self, id: u32) -> String {
        self.records()
            .into_iter()
            .find(|r| r.event.id == id)
            .map(|r| r.message)
            .unwrap_or_else(|| panic!("no record with event id {id}"))
    }
}

impl LogSink for CaptureSink {
    fn enabled(&self, level: Level) -> bool {
        level <= self.max
    }

    fn log(&self, record: &Record<'_>) {
        let mut captured = Captured {
            level: record.level,
            event: record.event,
            message: record.payload.to_string(),
            method: None,
            uri: None,
            status: None,
            elapsed: None,
        };
        match record.payload {
            Payload::Start { method, uri, .. } => {
                captured.method = Some((*method).clone());
                captured.uri = uri.clone();
            }
            Payload::End { elapsed, status, .. } => {
                captured.status = Some(*status);
                captured.elapsed = Some(*elapsed);
            }
            Payload::Headers(_) => {}
        }
        self.records.lock().unwrap().push(captured);
    }
}

/// Collects everything a `tracing_subscriber` fmt layer writes.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Buffer {
    type Writer = Buffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
