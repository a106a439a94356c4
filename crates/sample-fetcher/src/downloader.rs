//! HTTP transport

use crate::config::FetchConfig;
use crate::error::FetchResult;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Called after every chunk with the bytes written so far and the
/// expected total when the server announced one
pub type ProgressFn<'a> = dyn FnMut(u64, Option<u64>) -> io::Result<()> + 'a;

/// Fetches a URL into a local file
pub trait Downloader {
    /// Write the body of `url` to `dest`, returning the number of bytes written
    fn download(&self, url: &str, dest: &Path, progress: &mut ProgressFn<'_>) -> FetchResult<u64>;
}

/// Blocking reqwest client with the configured user agent and timeout
pub struct HttpDownloader {
    client: Client,
    chunk_size: usize,
}

impl HttpDownloader {
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            chunk_size: config.chunk_size.max(1),
        })
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path, progress: &mut ProgressFn<'_>) -> FetchResult<u64> {
        let mut response = self.client.get(url).send()?.error_for_status()?;
        let total = response.content_length().filter(|len| *len > 0);
        tracing::debug!(url, ?total, "Response received");

        let mut file = File::create(dest)?;
        let mut buffer = vec![0u8; self.chunk_size];
        let mut downloaded: u64 = 0;

        loop {
            let read = match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(&buffer[..read])?;
            downloaded += read as u64;
            progress(downloaded, total)?;
        }

        file.flush()?;
        Ok(downloaded)
    }
}
