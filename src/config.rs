//! Run configuration.
//!
//! Every directory and the catalog origin live here instead of in process-wide
//! constants, so a test can point the harvester at a temp dir and a mock server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Result, SCEL_EXT};

pub const DEFAULT_ORIGIN: &str = "https://pinyin.sogou.com";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_dir: PathBuf,
    origin: String,
    request_timeout: Duration,
}

impl Config {
    /// Config rooted at `base_dir`, talking to the real catalog.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            origin: DEFAULT_ORIGIN.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Config rooted at the current working directory.
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
    pub fn origin(&self) -> &str {
        &self.origin
    }
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `<base>/out`
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join("out")
    }
    /// Where downloaded `.scel` artifacts are stored.
    pub fn scel_dir(&self) -> PathBuf {
        self.output_dir().join("scel")
    }
    /// Where the converter writes the merged dictionary.
    pub fn dict_dir(&self) -> PathBuf {
        self.output_dir().join("dict")
    }

    /// `<scel_dir>/<file_stem>.scel`
    pub fn artifact_path(&self, file_stem: &str) -> PathBuf {
        self.scel_dir().join(format!("{file_stem}.{SCEL_EXT}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_hang_off_base() {
        let config = Config::new("/tmp/run");
        assert_eq!(config.scel_dir(), PathBuf::from("/tmp/run/out/scel"));
        assert_eq!(config.dict_dir(), PathBuf::from("/tmp/run/out/dict"));
        assert_eq!(
            config.artifact_path("词库A"),
            PathBuf::from("/tmp/run/out/scel/词库A.scel")
        );
    }

    #[test]
    fn origin_drops_trailing_slash() {
        let config = Config::new(".").with_origin("http://127.0.0.1:3000/");
        assert_eq!(config.origin(), "http://127.0.0.1:3000");
        assert_eq!(Config::new(".").origin(), DEFAULT_ORIGIN);
    }
}
