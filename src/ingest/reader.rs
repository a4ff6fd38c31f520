//! JSON-lines frame reader
//!
//! One frame per line:
//!
//! ```text
//! {"timestamp_ms": 33, "hands": [{"handedness": "Right", "landmarks": [[0.5, 0.4, 0.0], ...]}]}
//! ```
//!
//! Blank lines are ignored. A line that does not decode, including one
//! that is not valid UTF-8, is logged and skipped; only I/O errors end the
//! stream.

use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::error::{recovery_action, GestureError, Result};
use crate::landmark::Frame;
use crate::utils::{metric_names, MetricsCollector};

/// Decode one frame line
pub fn parse_frame(line: &str) -> Result<Frame> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Decode one raw line; `None` for a blank line
fn decode_line(raw: &[u8]) -> Result<Option<Frame>> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| GestureError::FrameDecode(format!("line is not valid UTF-8: {}", e)))?;
    if line.trim().is_empty() {
        return Ok(None);
    }
    parse_frame(line).map(Some)
}

/// Boxed reader for file or stdin input
pub type DynFrameSource = Pin<Box<dyn AsyncBufRead + Send>>;

pub struct FrameReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: u64,
    malformed: u64,
    metrics: Option<Arc<MetricsCollector>>,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            malformed: 0,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Next decodable frame, or `None` at end of input
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
                break;
            }
            self.line_no += 1;
            match decode_line(&self.buf) {
                Ok(Some(frame)) => return Ok(Some(frame)),
                Ok(None) => continue,
                Err(e) => {
                    warn!(
                        line = self.line_no,
                        action = ?recovery_action(&e),
                        "Skipping malformed frame: {}",
                        e
                    );
                    self.malformed += 1;
                    if let Some(metrics) = &self.metrics {
                        metrics.increment_counter(metric_names::FRAMES_MALFORMED, 1);
                    }
                }
            }
        }
        debug!(lines = self.line_no, "End of frame input");
        Ok(None)
    }

    /// Lines read so far, including skipped ones
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    /// Lines that failed to decode
    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}

impl FrameReader<DynFrameSource> {
    /// Open a file, or stdin when `path` is `-`
    pub async fn open(path: &Path) -> Result<Self> {
        let source: DynFrameSource = if path.as_os_str() == "-" {
            Box::pin(BufReader::new(tokio::io::stdin()))
        } else {
            let file = tokio::fs::File::open(path).await?;
            Box::pin(BufReader::new(file))
        };
        Ok(Self::new(source))
    }
}
