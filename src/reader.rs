use futures::stream::{self, Stream};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

/// Configuration for fragment reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Largest read handed to the splitter at once (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192, // WHY: 8KB is optimal for most filesystems and pipes
        }
    }
}

/// Async reader that turns a byte source into text fragments for the splitter
///
/// A fragment is whatever one read returned, decoded as UTF-8. Nothing waits
/// for a line break, so a producer that never writes `\n` is still split as it
/// arrives.
pub struct FragmentReader {
    config: ReaderConfig,
}

/// Read state: the source, the read buffer, and bytes of an unfinished UTF-8 sequence
struct ChunkDecoder<R> {
    source: R,
    buf: Vec<u8>,
    pending: Vec<u8>,
}

impl<R: AsyncRead + Unpin> ChunkDecoder<R> {
    /// Next decoded fragment, `None` at a clean end of input
    async fn next_fragment(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(fragment) = self.take_decoded()? {
                return Ok(Some(fragment));
            }

            let n = self.source.read(&mut self.buf).await?;
            if n == 0 {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "input ended inside a UTF-8 sequence",
                ));
            }
            self.pending.extend_from_slice(&self.buf[..n]);
        }
    }

    /// Split off the longest valid prefix of `pending`; an incomplete tail stays behind
    fn take_decoded(&mut self) -> io::Result<Option<String>> {
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.valid_up_to() > 0 => e.valid_up_to(),
            // Incomplete sequence at the very start: wait for more bytes
            Err(e) if e.error_len().is_none() => 0,
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        if valid == 0 {
            return Ok(None);
        }

        let tail = self.pending.split_off(valid);
        let bytes = std::mem::replace(&mut self.pending, tail);
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl FragmentReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Stream text fragments from any async byte source
    ///
    /// A multi-byte character split across two reads is carried over and
    /// completed by the next one. Stops at the first read or UTF-8 error,
    /// after yielding it.
    pub fn fragments<R>(&self, source: R) -> impl Stream<Item = io::Result<String>> + Unpin
    where
        R: AsyncRead + Unpin,
    {
        let decoder = ChunkDecoder {
            source,
            buf: vec![0; self.config.buffer_size.max(1)],
            pending: Vec::new(),
        };

        Box::pin(stream::unfold(Some(decoder), |decoder| async move {
            let mut decoder = decoder?;
            match decoder.next_fragment().await {
                Ok(Some(fragment)) => Some((Ok(fragment), Some(decoder))),
                Ok(None) => None,
                Err(e) => {
                    warn!("Stopped reading fragments: {}", e);
                    Some((Err(e), None))
                }
            }
        }))
    }

    /// Open a file and stream its text fragments
    pub async fn open<P: AsRef<Path>>(&self, path: P) -> io::Result<impl Stream<Item = io::Result<String>> + Unpin> {
        let path = path.as_ref();
        debug!("Opening fragment source: {}", path.display());
        let file = File::open(path).await?;
        Ok(self.fragments(file))
    }
}

impl Default for FragmentReader {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}
