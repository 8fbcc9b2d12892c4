//! Where a feed comes from: a remote URL or a local file.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{is_remote, validate_feed_url, FetchConfig};
use crate::error::{FeedError, Result};
use crate::http::{create_client, fetch_feed};

/// Origin of a feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// An `http://` or `https://` URL.
    Remote(String),

    /// A path on the local filesystem.
    Local(PathBuf),
}

impl FeedSource {
    /// Open the source as a byte stream ready for the walker.
    ///
    /// Remote sources are fetched with retries and a size cap. Local files are
    /// opened as-is.
    pub fn open(&self, config: &FetchConfig) -> Result<Box<dyn Read>> {
        match self {
            Self::Remote(url) => {
                let client = create_client(config)?;
                let body = fetch_feed(&client, url, config)?;
                Ok(Box::new(body))
            }
            Self::Local(path) => {
                let file = File::open(path).map_err(|source| FeedError::Open {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "Opened local feed");
                Ok(Box::new(file))
            }
        }
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl FromStr for FeedSource {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        if is_remote(s) {
            validate_feed_url(s)?;
            Ok(Self::Remote(s.to_string()))
        } else {
            Ok(Self::Local(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_parse_remote() {
        let source: FeedSource = "https://stackoverflow.com/feeds".parse().unwrap();
        assert_eq!(
            source,
            FeedSource::Remote("https://stackoverflow.com/feeds".to_string())
        );
        assert!(source.is_remote());
    }

    #[test]
    fn test_parse_local() {
        let source: FeedSource = "fixtures/feed.xml".parse().unwrap();
        assert_eq!(source, FeedSource::Local(PathBuf::from("fixtures/feed.xml")));
        assert_eq!(source.to_string(), "fixtures/feed.xml");
    }

    #[test]
    fn test_parse_rejects_malformed_url() {
        let err = "https://".parse::<FeedSource>().unwrap_err();
        assert!(matches!(err, FeedError::InvalidUrl(_)));
    }

    #[test]
    fn test_open_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<feed/>").unwrap();

        let source = FeedSource::Local(file.path().to_path_buf());
        let mut reader = source.open(&FetchConfig::default()).unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "<feed/>");
    }

    #[test]
    fn test_open_missing_file() {
        let source = FeedSource::Local(PathBuf::from("/nonexistent/feed.xml"));
        let Err(err) = source.open(&FetchConfig::default()) else {
            panic!("opening a missing file should fail");
        };
        assert_eq!(err.kind(), ErrorKind::Acquisition);
        assert!(err.to_string().contains("/nonexistent/feed.xml"));
    }
}
