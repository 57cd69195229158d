//! Serial device source

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{info, trace};

use crate::source::ByteSource;
use crate::{GatewayError, Result};

/// Reads the gateway's serial device node.
///
/// Line discipline (baud rate, raw mode) is not touched here; configure the port
/// beforehand, e.g. `stty -F /dev/ttyUSB0 57600 raw -echo`.
pub struct SerialSource {
    path: PathBuf,
    file: File,
    buf: Vec<u8>,
}

impl SerialSource {
    /// Open the device for reading. Each read returns at most `chunk_size` bytes.
    pub async fn open<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await.map_err(|e| GatewayError::device_error(&path, e))?;

        info!("Connected to serial device {}", path.display());

        Ok(Self { path, file, buf: vec![0; chunk_size.max(1)] })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ByteSource for SerialSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let n = self.file.read(&mut self.buf).await.map_err(GatewayError::read_failed)?;
        if n == 0 {
            info!("Serial device {} reported end of stream", self.path.display());
            return Ok(None);
        }

        trace!("Read {} bytes from {}", n, self.path.display());
        Ok(Some(self.buf[..n].to_vec()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
