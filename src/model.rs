//! Records produced by the comic client and the What If? archive parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Link text carried by sentinel comics.
pub const INVALID_COMIC_LINK: &str = "Invalid comic";

/// One comic's metadata.
///
/// A `number <= 0` marks a sentinel ("invalid / not found"); only `number`
/// and `link` are meaningful then, every other field is left at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub number: i64,
    /// Comic page URL, or [INVALID_COMIC_LINK] for sentinels.
    pub link: String,
    pub title: String,
    #[serde(rename = "altText")]
    pub alt_text: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Image file name, derived from `image_url`.
    #[serde(rename = "imageName")]
    pub image_name: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

impl Comic {
    /// Sentinel record for a number that does not name a comic.
    pub fn invalid(number: i64) -> Self {
        Comic {
            number,
            link: INVALID_COMIC_LINK.to_string(),
            ..Default::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.number > 0
    }

    /// Open the comic page in the system browser. Does nothing for sentinels.
    pub fn show(&self) {
        if self.is_valid() {
            open_in_browser(&self.link);
        }
    }
}

impl fmt::Display for Comic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comic object for {}", self.link)
    }
}

/// One What If? article as listed in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatIf {
    pub number: u32,
    pub title: String,
    /// Absolute article URL.
    pub link: String,
}

impl WhatIf {
    /// Open the article in the system browser.
    pub fn show(&self) {
        open_in_browser(&self.link);
    }
}

impl fmt::Display for WhatIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "What If object for {}", self.link)
    }
}

/// Archive mapping: article number to article. Last insert for a number wins.
pub type WhatIfArchive = BTreeMap<u32, WhatIf>;

/// Fire-and-forget: failures are logged, never returned.
pub(crate) fn open_in_browser(url: &str) {
    if let Err(e) = open::that(url) {
        log::warn!("Could not open {} in a browser: {}", url, e);
    }
}
