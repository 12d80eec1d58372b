//! xkcd: client library and CLI for xkcd comics and the What If? article archive.

pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod markup;
pub mod model;

// Re-exports for CLI and consumers.
pub use api::comic::{image_name, image_url_2x, DownloadOptions};
pub use api::{parse_number, Endpoints, Fetch, HttpClient, HttpClientBuilder, XkcdClient, XkcdError};
pub use archive::{parse_archive, ArchiveParser};
pub use markup::{tokenize, MarkupEvent};
pub use model::{Comic, WhatIf, WhatIfArchive, INVALID_COMIC_LINK};
