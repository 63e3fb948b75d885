//! Release server layout: index and binary URLs, index parsing and
//! download progress.
//!
//! Releases live under `<release_domain><platform>/`; that directory holds
//! `index.txt`, one binary name per line.

use crate::config::LauncherConfig;
use crate::error::{TermtextError, TermtextResult};
use serde::{Deserialize, Serialize};

pub const INDEX_FILE: &str = "index.txt";

/// URL of the platform's release index.
pub fn index_url(config: &LauncherConfig) -> String {
    binary_url(config, INDEX_FILE)
}

/// URL of a file listed in the release index.
pub fn binary_url(config: &LauncherConfig, name: &str) -> String {
    let mut url = config.release_domain.clone();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(&config.platform);
    url.push('/');
    url.push_str(name.trim_start_matches('/'));
    url
}

/// Binary names listed in an index body.
///
/// Lines are trimmed. Lines that are empty after trimming, including
/// whitespace-only ones, are skipped rather than reported as a nameless
/// binary, since no download URL can be built from them.
///
/// # Errors
/// Returns `E_PROTOCOL` if the body is not UTF-8.
pub fn parse_index(body: &[u8]) -> TermtextResult<Vec<String>> {
    let text = std::str::from_utf8(body).map_err(|err| {
        TermtextError::protocol(
            "release index is not valid UTF-8",
            serde_json::json!({ "valid_up_to": err.valid_up_to() }),
        )
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Bytes received so far for a download.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub received: u64,
    /// Total size, when the server announced one.
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// Completion in whole percent, clamped to 100.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|total| *total > 0)?;
        let percent = u128::from(self.received) * 100 / u128::from(total);
        Some(u8::try_from(percent.min(100)).unwrap_or(100))
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.received >= total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(domain: &str, platform: &str) -> LauncherConfig {
        LauncherConfig {
            release_domain: domain.to_string(),
            platform: platform.to_string(),
            ..LauncherConfig::default()
        }
    }

    #[test]
    fn urls_join_domain_and_platform() {
        let config = config("https://releases.axiodl.com/", "linux");
        assert_eq!(index_url(&config), "https://releases.axiodl.com/linux/index.txt");
        assert_eq!(
            binary_url(&config, "urde-v1.tar.gz"),
            "https://releases.axiodl.com/linux/urde-v1.tar.gz"
        );
    }

    #[test]
    fn missing_trailing_slash_is_added() {
        let config = config("https://mirror.example.org", "win32");
        assert_eq!(index_url(&config), "https://mirror.example.org/win32/index.txt");
    }

    #[test]
    fn index_lines_are_trimmed() {
        let names = parse_index(b"  a.zip \r\n\r\nb.zip\n\n").unwrap();
        assert_eq!(names, vec!["a.zip", "b.zip"]);
    }

    #[test]
    fn whitespace_only_lines_are_not_binaries() {
        let names = parse_index(b"a.zip\n \t \n\r\nb.zip").unwrap();
        assert_eq!(names, vec!["a.zip", "b.zip"]);
    }

    #[test]
    fn invalid_utf8_index_is_a_protocol_error() {
        let err = parse_index(b"ok\n\xff\n").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Protocol);
    }

    #[test]
    fn percent_needs_known_total() {
        let progress = DownloadProgress {
            received: 50,
            total: None,
        };
        assert_eq!(progress.percent(), None);
        let progress = DownloadProgress {
            received: 1,
            total: Some(3),
        };
        assert_eq!(progress.percent(), Some(33));
        let progress = DownloadProgress {
            received: 10,
            total: Some(5),
        };
        assert_eq!(progress.percent(), Some(100));
        assert!(progress.is_complete());
    }
}
