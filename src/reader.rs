//! Background line delivery: byte-stream framing and the reader thread.
//!
//! The protocol core never sees raw bytes. A [`ReaderThread`] owns the read
//! side of the channel, cuts the byte stream into terminator-delimited lines
//! with a [`LineFramer`], and hands each line to
//! [`AtProtocol::handle_line`](crate::AtProtocol::handle_line) strictly in
//! arrival order. There is exactly one delivery context per protocol
//! instance.

use crate::protocol::AtProtocol;
use crate::transport::LINE_TERMINATOR;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Incremental CRLF framer.
///
/// Buffers partial input across reads, so a terminator split between two
/// chunks still produces exactly one line. Decoding is lossy UTF-8; the
/// protocol layer discards the empty lines a leading terminator produces.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `bytes` and return every complete line they finish.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = memchr::memmem::find(&self.buf, LINE_TERMINATOR) {
            let line: Vec<u8> = self
                .buf
                .drain(..pos + LINE_TERMINATOR.len())
                .take(pos)
                .collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Bytes buffered without a terminator yet.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Dedicated thread reading a byte source and delivering lines to a protocol.
///
/// The source should read with a short timeout (see
/// [`PortSettings::read_timeout`](crate::PortSettings)) so the thread can
/// notice [`shutdown`](ReaderThread::shutdown) between reads. End of stream
/// or a hard I/O error ends the thread on its own.
pub struct ReaderThread {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl ReaderThread {
    /// Spawn the delivery thread over `source`.
    pub fn spawn<R>(mut source: R, protocol: Arc<AtProtocol>) -> Self
    where
        R: Read + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("atline-reader".to_string())
            .spawn(move || {
                let mut framer = LineFramer::new();
                let mut buf = [0u8; 1024];
                while !stop_flag.load(Ordering::Relaxed) {
                    match source.read(&mut buf) {
                        Ok(0) => {
                            debug!("Line source reached end of stream");
                            break;
                        }
                        Ok(n) => {
                            for line in framer.push(&buf[..n]) {
                                protocol.handle_line(&line);
                            }
                        }
                        Err(e)
                            if matches!(
                                e.kind(),
                                std::io::ErrorKind::TimedOut
                                    | std::io::ErrorKind::WouldBlock
                                    | std::io::ErrorKind::Interrupted
                            ) =>
                        {
                            continue;
                        }
                        Err(e) => {
                            warn!("Reader thread stopping after read error: {}", e);
                            break;
                        }
                    }
                }
            })
            .expect("failed to spawn reader thread");

        Self {
            handle: Some(handle),
            stop,
        }
    }

    /// Ask the thread to stop after its current read and wait for it.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReaderThread {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

impl std::fmt::Debug for ReaderThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderThread")
            .field("running", &self.handle.is_some())
            .finish()
    }
}
