//! URL parsing and file name extraction.

use crate::error::Error;

use percent_encoding::percent_decode_str;
use reqwest::Url;
use std::convert::TryFrom;
use std::path::{Component, Path, PathBuf};

/// File name used when the last path segment is empty or would not stay
/// inside the save directory.
pub const FALLBACK_FILENAME: &str = "Untitled";

/// Represents a file to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// URL of the file to download.
    pub url: Url,
    /// File name used to save the file on disk.
    pub filename: String,
}

impl Download {
    /// Full path of the file inside `directory`.
    pub fn destination(&self, directory: &Path) -> PathBuf {
        directory.join(&self.filename)
    }
}

impl TryFrom<&Url> for Download {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        let segment = value
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "The url \"{}\" does not contain a valid path",
                    value
                ))
            })?
            .next_back()
            .unwrap_or_default();

        let decoded = percent_decode_str(segment).decode_utf8_lossy();

        Ok(Download {
            url: value.clone(),
            filename: if is_plain_file_name(&decoded) {
                decoded.into_owned()
            } else {
                FALLBACK_FILENAME.to_string()
            },
        })
    }
}

/// A name is usable only if joining it onto a directory yields a direct child
/// of that directory.
fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl TryFrom<&str> for Download {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| Download::try_from(&u))
    }
}
