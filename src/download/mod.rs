//! Download target resolution.
//!
//! A [`Download`] is what a task derives from its URL before touching the
//! network: the parsed URL and the file name the body is saved under.
//!
//! ```rust
//! use fetchpool::download::Download;
//! use std::convert::TryFrom;
//! use std::path::Path;
//!
//! let download = Download::try_from("https://example.com/files/archive.zip")?;
//! assert_eq!(download.filename, "archive.zip");
//! assert_eq!(
//!     download.destination(Path::new("/tmp")),
//!     Path::new("/tmp/archive.zip")
//! );
//! # Ok::<(), fetchpool::Error>(())
//! ```

pub mod download;

pub use download::{Download, FALLBACK_FILENAME};
