//! JSON Lines 지표 싱크.
//!
//! 방출 한 건을 `{kind, record, snapshot, emittedAt}` 한 줄로 기록한다.

use chrono::{DateTime, Utc};
use pagemon_core::models::metric::MetricKind;
use pagemon_core::models::record::MetricRecord;
use pagemon_core::models::snapshot::AggregateSnapshot;
use pagemon_core::ports::sink::MetricSink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// 기록 한 줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionLine {
    pub kind: MetricKind,
    pub record: MetricRecord,
    pub snapshot: AggregateSnapshot,
    pub emitted_at: DateTime<Utc>,
}

/// JSON Lines 싱크
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
    written: AtomicUsize,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            written: AtomicUsize::new(0),
        }
    }

    /// 기록된 줄 수
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }

    fn write_line(&self, line: &EmissionLine) -> io::Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, line)?;
        writer.write_all(b"\n")
    }
}

impl<W: Write + Send> MetricSink for JsonLinesSink<W> {
    fn on_metric(&self, kind: MetricKind, record: &MetricRecord, snapshot: &AggregateSnapshot) {
        let line = EmissionLine {
            kind,
            record: record.clone(),
            snapshot: snapshot.clone(),
            emitted_at: Utc::now(),
        };
        match self.write_line(&line) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!("방출 기록 실패 ({}): {}", kind, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagemon_core::models::record::ValueRecord;

    #[test]
    fn writes_one_line_per_emission() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let sink = JsonLinesSink::new(file.reopen().unwrap());

        let record = MetricRecord::Value(ValueRecord { value: 1500.0 });
        let mut snapshot = AggregateSnapshot::new();
        snapshot.insert(MetricKind::Tti, record.clone());
        sink.on_metric(MetricKind::Tti, &record, &snapshot);
        sink.on_metric(MetricKind::Tti, &record, &snapshot);
        sink.flush().unwrap();

        assert_eq!(sink.written(), 2);
        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let line: EmissionLine = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(line.kind, MetricKind::Tti);
        assert_eq!(line.snapshot.get(MetricKind::Tti), Some(&record));
    }
}
