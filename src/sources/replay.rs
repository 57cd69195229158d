//! Replay source for captured byte dumps

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::source::ByteSource;
use crate::{GatewayError, Result};

/// Replays a captured serial byte stream in fixed-size chunks.
pub struct ReplaySource {
    path: PathBuf,
    data: Vec<u8>,
    position: usize,
    chunk_size: usize,
}

impl ReplaySource {
    /// Load a capture file.
    pub async fn open<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = tokio::fs::read(&path).await.map_err(|e| GatewayError::file_error(&path, e))?;

        info!("Opened capture {}: {} bytes", path.display(), data.len());

        Ok(Self::from_bytes_with_path(data, chunk_size, path))
    }

    /// Replay in-memory bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
        Self::from_bytes_with_path(data.into(), chunk_size, PathBuf::from("<memory>"))
    }

    fn from_bytes_with_path(data: Vec<u8>, chunk_size: usize, path: PathBuf) -> Self {
        Self { path, data, position: 0, chunk_size: chunk_size.max(1) }
    }

    /// Bytes not yet replayed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

#[async_trait::async_trait]
impl ByteSource for ReplaySource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if self.position >= self.data.len() {
            debug!("Reached end of capture");
            return Ok(None);
        }

        let end = (self.position + self.chunk_size).min(self.data.len());
        let chunk = self.data[self.position..end].to_vec();
        self.position = end;
        Ok(Some(chunk))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
