// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Payload sources and the loading / failed / ready tri-state

use massing_lite_core::MassingData;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Where a massing payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Stdin,
    Url(String),
    /// JSON text given directly on the command line
    Inline(String),
}

impl Source {
    /// Interpret a command-line argument. `-` is stdin, `http(s)://` is a
    /// URL, anything else a file path unless `inline` is set.
    pub fn parse(arg: &str, inline: bool) -> Self {
        if inline {
            Self::Inline(arg.to_string())
        } else if arg == "-" {
            Self::Stdin
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
            Self::Url(url) => url.clone(),
            Self::Inline(json) => format!("<inline, {} bytes>", json.len()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(std::io::Error),

    #[error("Request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Payload(#[from] massing_lite_core::Error),
}

/// Payload load progress
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Failed(LoadError),
    Ready(Box<MassingData>),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Loads one payload at a time
#[derive(Debug)]
pub struct Loader {
    timeout: Duration,
    state: LoadState,
}

impl Loader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: LoadState::Loading,
        }
    }

    /// Fetch and parse `source`; the state is `Loading` until this returns
    pub fn load(&mut self, source: &Source) -> &LoadState {
        self.state = LoadState::Loading;
        info!(source = %source.describe(), "Loading massing payload");

        self.state = match self.read(source) {
            Ok(bytes) => match MassingData::from_slice(&bytes) {
                Ok(data) => LoadState::Ready(Box::new(data)),
                Err(err) => LoadState::Failed(err.into()),
            },
            Err(err) => LoadState::Failed(err),
        };
        &self.state
    }

    /// Take the loaded payload out, leaving the loader `Loading` again
    pub fn take(&mut self) -> LoadState {
        std::mem::replace(&mut self.state, LoadState::Loading)
    }

    fn read(&self, source: &Source) -> Result<Vec<u8>, LoadError> {
        match source {
            Source::Path(path) => std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Source::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut bytes)
                    .map_err(LoadError::Stdin)?;
                Ok(bytes)
            }
            Source::Url(url) => self.fetch(url),
            Source::Inline(json) => Ok(json.as_bytes().to_vec()),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let response = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?
            .get(url)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes()?;
        debug!(url, bytes = bytes.len(), "Fetched massing payload");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "lot": {"polygon": [[0, 0], [50, 0], [50, 100], [0, 100]]},
        "scenarios": [{"name": "Only", "floors": []}]
    }"#;

    #[test]
    fn test_source_parse() {
        assert_eq!(Source::parse("-", false), Source::Stdin);
        assert_eq!(
            Source::parse("https://example.com/massing.json", false),
            Source::Url("https://example.com/massing.json".into())
        );
        assert_eq!(
            Source::parse("payload.json", false),
            Source::Path(PathBuf::from("payload.json"))
        );
        assert_eq!(Source::parse("-", true), Source::Inline("-".into()));
    }

    #[test]
    fn test_inline_ready() {
        let mut loader = Loader::new(Duration::from_secs(1));
        assert!(matches!(loader.take(), LoadState::Loading));

        let state = loader.load(&Source::Inline(MINIMAL.into()));
        assert!(state.is_ready());

        match loader.take() {
            LoadState::Ready(data) => assert_eq!(data.scenario_count(), 1),
            other => panic!("expected ready, got {:?}", other),
        }
        assert!(matches!(loader.take(), LoadState::Loading));
    }

    #[test]
    fn test_failures() {
        let mut loader = Loader::new(Duration::from_secs(1));

        let state = loader.load(&Source::Inline("{not json".into()));
        assert!(matches!(state, LoadState::Failed(LoadError::Payload(_))));

        let empty = r#"{"lot": {"polygon": []}, "scenarios": []}"#;
        let state = loader.load(&Source::Inline(empty.into()));
        assert!(matches!(
            state,
            LoadState::Failed(LoadError::Payload(massing_lite_core::Error::NoScenarios))
        ));

        let state = loader.load(&Source::Path("/nonexistent/massing.json".into()));
        assert!(matches!(state, LoadState::Failed(LoadError::Io { .. })));
    }
}
