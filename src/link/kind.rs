//! Content kind detection (image or video) by extension or HEAD probe

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::resolver::ParsedLink;

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "svg", "webp", "avif", "apng", "ico", "tif", "tiff",
];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv", "ogg", "mov", "m4v", "mkv"];

/// What a banner locator points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
}

impl ContentKind {
    /// Kind from the extension of a locator's path, ignoring query and fragment
    pub fn from_extension(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(ContentKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(ContentKind::Video)
        } else {
            None
        }
    }

    /// Kind from a `Content-Type` header value
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime.starts_with("image/") {
            Some(ContentKind::Image)
        } else if mime.starts_with("video/") {
            Some(ContentKind::Video)
        } else {
            None
        }
    }
}

/// Fetches the content type of a remote resource
#[async_trait]
pub trait ContentProbe: Send + Sync {
    async fn head_content_type(&self, url: &str) -> Result<Option<String>>;
}

/// [`ContentProbe`] backed by an HTTP HEAD request
#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentProbe for HttpProbe {
    async fn head_content_type(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .with_context(|| format!("HEAD request failed: {}", url))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(content_type)
    }
}

impl ParsedLink {
    /// Fill in `kind`. The extension decides when it can; otherwise external
    /// links are probed. Probe failures leave `kind` unset.
    pub async fn classify(mut self, probe: Option<&dyn ContentProbe>) -> Self {
        self.kind = ContentKind::from_extension(&self.url);
        if self.kind.is_some() || !self.external {
            return self;
        }

        if let Some(probe) = probe {
            match probe.head_content_type(&self.url).await {
                Ok(Some(content_type)) => {
                    self.kind = ContentKind::from_content_type(&content_type);
                }
                Ok(None) => debug!(url = %self.url, "no content type returned"),
                Err(e) => debug!(url = %self.url, error = %e, "content probe failed"),
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{DocumentContext, FileEntry, FileIndex, LinkParser};
    use anyhow::bail;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoFiles;

    impl FileIndex for NoFiles {
        fn find_by_path(&self, _path: &str) -> Option<FileEntry> {
            None
        }

        fn find_by_name(&self, _name: &str) -> Option<FileEntry> {
            None
        }

        fn resolve_relative(&self, _path: &str, _from_path: &str) -> Option<FileEntry> {
            None
        }

        fn resource_url_of(&self, entry: &FileEntry) -> String {
            entry.path.clone()
        }
    }

    struct FixedProbe {
        content_type: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentProbe for FixedProbe {
        async fn head_content_type(&self, _url: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.content_type.map(String::from))
        }
    }

    struct FailingProbe;

    #[async_trait]
    impl ContentProbe for FailingProbe {
        async fn head_content_type(&self, url: &str) -> Result<Option<String>> {
            bail!("host unreachable: {}", url)
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ContentKind::from_extension("banner.PNG"), Some(ContentKind::Image));
        assert_eq!(
            ContentKind::from_extension("https://cdn.example.com/clip.webm?t=3#x"),
            Some(ContentKind::Video)
        );
        assert_eq!(ContentKind::from_extension("https://example.com/image"), None);
        assert_eq!(ContentKind::from_extension("https://example.com.au/"), None);
        assert_eq!(ContentKind::from_extension("notes.md"), None);
    }

    #[test]
    fn test_from_content_type() {
        assert_eq!(ContentKind::from_content_type("image/jpeg"), Some(ContentKind::Image));
        assert_eq!(
            ContentKind::from_content_type("Video/MP4; codecs=avc1"),
            Some(ContentKind::Video)
        );
        assert_eq!(ContentKind::from_content_type("text/html"), None);
    }

    #[tokio::test]
    async fn test_extension_skips_probe() {
        let probe = FixedProbe { content_type: Some("video/mp4"), calls: AtomicUsize::new(0) };
        let parser = LinkParser::new(&NoFiles);

        let link = parser
            .parse("https://example.com/a.png", None, None)
            .classify(Some(&probe))
            .await;
        assert_eq!(link.kind, Some(ContentKind::Image));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_when_extension_inconclusive() {
        let probe = FixedProbe { content_type: Some("video/mp4"), calls: AtomicUsize::new(0) };
        let parser = LinkParser::new(&NoFiles);

        let link = parser
            .parse("https://example.com/stream", None, None)
            .classify(Some(&probe))
            .await;
        assert_eq!(link.kind, Some(ContentKind::Video));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_local_links_are_not_probed() {
        let probe = FixedProbe { content_type: Some("image/png"), calls: AtomicUsize::new(0) };
        let parser = LinkParser::new(&NoFiles);
        let context = DocumentContext::new("a.md");

        let link = parser
            .parse("[[banner]]", Some(&context), None)
            .classify(Some(&probe))
            .await;
        assert_eq!(link.kind, None);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_failure_is_swallowed() {
        let parser = LinkParser::new(&NoFiles);

        let link = parser
            .parse("https://unreachable.invalid/banner", None, None)
            .classify(Some(&FailingProbe))
            .await;
        assert_eq!(link.kind, None);
        assert_eq!(link.url, "https://unreachable.invalid/banner");
    }
}
