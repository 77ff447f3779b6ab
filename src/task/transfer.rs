//! Range-aware request and response classification.

use crate::error::{Error, Result};
use crate::utils::content_length::{remaining_length, total_size};

use reqwest::{header::RANGE, Response, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tracing::debug;

/// How the server answered a ranged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    /// 416: nothing left past the local size.
    Complete,
    /// 206: the body continues the local file.
    Append,
    /// Any other 2xx: the body is the whole resource.
    Restart,
}

impl Resume {
    /// Classify a response status.
    pub(crate) fn classify(status: StatusCode) -> Result<Self> {
        match status {
            StatusCode::RANGE_NOT_SATISFIABLE => Ok(Resume::Complete),
            StatusCode::PARTIAL_CONTENT => Ok(Resume::Append),
            s if s.is_success() => Ok(Resume::Restart),
            status => Err(Error::Protocol { status }),
        }
    }
}

/// An open response plus where its body lands in the file.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) response: Response,
    pub(crate) resume: Resume,
    /// Bytes already on disk that the body continues from.
    pub(crate) offset: u64,
    /// Size on disk before the request plus the announced body length, 0 when
    /// the length is unknown.
    pub(crate) total: u64,
}

impl Session {
    /// Request everything from `existing_size` onwards.
    pub(crate) async fn open(
        client: &ClientWithMiddleware,
        url: &Url,
        existing_size: u64,
    ) -> Result<Self> {
        debug!("Fetching {} from offset {}", url, existing_size);
        let response = client
            .get(url.clone())
            .header(RANGE, format!("bytes={}-", existing_size))
            .send()
            .await?;

        let resume = Resume::classify(response.status())?;
        let offset = match resume {
            Resume::Complete | Resume::Append => existing_size,
            Resume::Restart => 0,
        };
        let total = match resume {
            Resume::Complete => existing_size,
            _ => total_size(existing_size, remaining_length(&response)),
        };
        debug!(
            "{} answered {} ({:?}), resuming at {} of {}",
            url,
            response.status(),
            resume,
            offset,
            total
        );

        Ok(Self {
            response,
            resume,
            offset,
            total,
        })
    }

    /// Open the destination the way the response requires.
    pub(crate) async fn open_destination(&self, path: &Path) -> Result<File> {
        debug!("Opening destination file {:?} ({:?})", path, self.resume);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.resume == Resume::Append)
            .truncate(self.resume == Resume::Restart)
            .open(path)
            .await?;
        Ok(file)
    }
}

/// Size of the file at `path`, 0 when there is none.
pub(crate) async fn existing_size(path: &Path) -> Result<u64> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Delete the file at `path` if it exists.
pub(crate) async fn remove_partial(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
