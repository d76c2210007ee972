//! DownloadSource that fabricates files instead of running yt-dlp

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use url::Url;

use vidgrab::download::{DownloadError, DownloadSource, ExtractOptions, ExtractionResult};

/// What the fake extractor does when called
pub enum SourceBehavior {
    /// Writes `file_name` of `size` bytes into the request directory
    Produce {
        title: String,
        file_name: String,
        size: u64,
    },
    /// Leaves a partial file behind, then fails like yt-dlp with this stderr
    FailWithStderr(String),
    /// Fails with a ready-made error
    Fail(fn() -> DownloadError),
}

impl SourceBehavior {
    pub fn produce(title: &str, file_name: &str, size: u64) -> Self {
        SourceBehavior::Produce {
            title: title.to_string(),
            file_name: file_name.to_string(),
            size,
        }
    }
}

pub struct MockSource {
    behavior: SourceBehavior,
    calls: Mutex<Vec<(Url, ExtractOptions)>>,
}

impl MockSource {
    pub fn new(behavior: SourceBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Url, ExtractOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Request directories the source was asked to write into.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        self.calls().into_iter().map(|(_, o)| o.output_dir).collect()
    }
}

/// Creates a sparse file of `size` bytes.
fn fake_file(path: &std::path::Path, size: u64) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    file.set_len(size)
}

#[async_trait]
impl DownloadSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn download(&self, url: &Url, options: &ExtractOptions) -> Result<ExtractionResult, DownloadError> {
        self.calls.lock().unwrap().push((url.clone(), options.clone()));

        match &self.behavior {
            SourceBehavior::Produce { title, file_name, size } => {
                let path = options.output_dir.join(file_name);
                fake_file(&path, *size).map_err(|e| DownloadError::Other(e.to_string()))?;
                ExtractionResult::from_file(title, &path)
                    .await
                    .map_err(|e| DownloadError::Other(e.to_string()))
            }
            SourceBehavior::FailWithStderr(stderr) => {
                let partial = options.output_dir.join("abc.mp4.part");
                fake_file(&partial, 4096).map_err(|e| DownloadError::Other(e.to_string()))?;
                Err(vidgrab::download::ytdlp_errors::classify_failure(stderr, options.max_file_size))
            }
            SourceBehavior::Fail(make) => Err(make()),
        }
    }
}
