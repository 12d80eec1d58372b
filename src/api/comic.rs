//! Comic lookups from the xkcd JSON endpoint, and image downloads.

use super::{fetch_json, int_field, str_field, Fetch, XkcdClient, XkcdError};
use crate::model::Comic;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Where and how [XkcdClient::download_image] writes the image.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Target directory. Missing or nonexistent falls back to the user's Downloads directory.
    pub output_dir: Option<PathBuf>,
    /// File name. Default `xkcd-{number}-{image name}`.
    pub output_file: Option<String>,
    /// Fetch the double-resolution image.
    pub x2: bool,
    /// Suppress warnings for soft failures.
    pub silent: bool,
}

impl<F: Fetch> XkcdClient<F> {
    /// Build the record for one comic. Numbers `<= 0` return a sentinel without any request.
    pub fn fetch_comic(&self, number: i64) -> Result<Comic, XkcdError> {
        if number <= 0 {
            return Ok(Comic::invalid(number));
        }
        let url = self.endpoints.comic_json_url(number);
        let data = fetch_json(&self.fetcher, &url)?;
        let image_url = str_field(&data, &url, "img")?;
        let date_field = |key: &str| -> Result<i32, XkcdError> {
            i32::try_from(int_field(&data, &url, key)?).map_err(|_| XkcdError::MissingField {
                url: url.clone(),
                field: key.to_string(),
            })
        };
        Ok(Comic {
            number: int_field(&data, &url, "num")?,
            link: self.endpoints.comic_url(number),
            title: str_field(&data, &url, "safe_title")?,
            alt_text: str_field(&data, &url, "alt")?,
            image_name: image_name(&image_url, &self.endpoints.image_prefix).to_string(),
            image_url,
            day: date_field("day")?,
            month: date_field("month")?,
            year: date_field("year")?,
        })
    }

    /// explainxkcd wiki page for the comic; `None` for sentinels.
    pub fn explanation_link(&self, comic: &Comic) -> Option<String> {
        comic
            .is_valid()
            .then(|| self.endpoints.explain_url(comic.number))
    }

    /// Number of the newest comic.
    pub fn latest_comic_number(&self) -> Result<i64, XkcdError> {
        let url = self.endpoints.latest_json_url();
        let data = fetch_json(&self.fetcher, &url)?;
        int_field(&data, &url, "num")
    }

    pub fn latest_comic(&self) -> Result<Comic, XkcdError> {
        let number = self.latest_comic_number()?;
        self.fetch_comic(number)
    }

    /// Uniformly random comic in `1..=latest`.
    pub fn random_comic(&self) -> Result<Comic, XkcdError> {
        let latest = self.latest_comic_number()?;
        if latest < 1 {
            return Ok(Comic::invalid(-1));
        }
        let number = rand::rng().random_range(1..=latest);
        self.fetch_comic(number)
    }

    /// Comic by number, checked against the latest number first.
    ///
    /// Out-of-range numbers are not an error: the result is the sentinel
    /// `Comic::invalid(-1)`, with a warning logged unless `silent`.
    pub fn comic(&self, number: i64, silent: bool) -> Result<Comic, XkcdError> {
        let latest = self.latest_comic_number()?;
        if number > latest || number <= 0 {
            if !silent {
                log::warn!(
                    "Requested comic {} is invalid (latest is {})",
                    number,
                    latest
                );
            }
            return Ok(Comic::invalid(-1));
        }
        self.fetch_comic(number)
    }

    /// Download the comic's image and return the written path.
    ///
    /// Fetch failures are errors. A file that cannot be written gives `Ok(None)`.
    pub fn download_image(
        &self,
        comic: &Comic,
        options: &DownloadOptions,
    ) -> Result<Option<PathBuf>, XkcdError> {
        if !comic.is_valid() {
            if !options.silent {
                log::warn!("Comic {} has no image to download", comic.number);
            }
            return Ok(None);
        }
        let (image_url, name) = if options.x2 {
            let url = image_url_2x(&comic.image_url);
            let name = image_name(&url, &self.endpoints.image_prefix).to_string();
            (url, name)
        } else {
            (comic.image_url.clone(), comic.image_name.clone())
        };
        let bytes = self.fetcher.fetch(&image_url)?;

        let Some(dir) = resolve_output_dir(options.output_dir.as_deref(), options.silent) else {
            return Ok(None);
        };
        let file_name = match options.output_file.as_deref() {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => format!("xkcd-{}-{}", comic.number, name),
        };
        match write_file(dir.join(file_name), &bytes) {
            Ok(path) => Ok(Some(path)),
            Err(e) => {
                if !options.silent {
                    log::warn!("{}", e);
                }
                Ok(None)
            }
        }
    }
}

/// Create or truncate `path` and write `bytes` to it.
fn write_file(path: PathBuf, bytes: &[u8]) -> Result<PathBuf, XkcdError> {
    match std::fs::write(&path, bytes) {
        Ok(()) => Ok(path),
        Err(source) => Err(XkcdError::Io { path, source }),
    }
}

/// Part of `image_url` after `prefix`; the whole URL when the prefix is absent.
pub fn image_name<'a>(image_url: &'a str, prefix: &str) -> &'a str {
    match image_url.find(prefix) {
        Some(i) => &image_url[i + prefix.len()..],
        None => image_url,
    }
}

/// `.../foo.png` -> `.../foo_2x.png`. Without an extension `_2x` is appended.
pub fn image_url_2x(image_url: &str) -> String {
    let file_start = image_url.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image_url[file_start..].rfind('.') {
        Some(dot) => {
            let dot = file_start + dot;
            format!("{}_2x{}", &image_url[..dot], &image_url[dot..])
        }
        None => format!("{}_2x", image_url),
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// `~/Downloads`, or the platform download directory when there is no home.
fn default_download_dir() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join("Downloads"))
        .or_else(dirs::download_dir)
}

fn resolve_output_dir(requested: Option<&Path>, silent: bool) -> Option<PathBuf> {
    if let Some(dir) = requested.filter(|d| !d.as_os_str().is_empty()) {
        let dir = expand_home(dir);
        if dir.is_dir() {
            return Some(dir);
        }
    }
    let Some(dir) = default_download_dir() else {
        if !silent {
            log::warn!("Cannot determine a Downloads directory");
        }
        return None;
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        if !silent {
            log::warn!("Unable to create {}: {}", dir.display(), e);
        }
        return None;
    }
    Some(dir)
}
