//! What If? lookups layered over the scraped archive.
//!
//! Every query accepts an archive the caller already holds; with `None` the
//! archive page is fetched and parsed again. Nothing is cached here.

use super::{Fetch, XkcdClient, XkcdError};
use crate::archive::parse_archive;
use crate::model::{WhatIf, WhatIfArchive};
use rand::Rng;
use std::borrow::Cow;

impl<F: Fetch> XkcdClient<F> {
    /// Fetch and parse the archive page. A page with no recognizable entries gives an empty map.
    pub fn fetch_whatif_archive(&self) -> Result<WhatIfArchive, XkcdError> {
        let bytes = self.fetcher.fetch(&self.endpoints.whatif_archive)?;
        let html = String::from_utf8_lossy(&bytes);
        let archive = parse_archive(&html, &self.endpoints);
        if archive.is_empty() {
            log::warn!(
                "No archive entries found at {}",
                self.endpoints.whatif_archive
            );
        }
        Ok(archive)
    }

    fn archive_or_fetch<'a>(
        &self,
        archive: Option<&'a WhatIfArchive>,
    ) -> Result<Cow<'a, WhatIfArchive>, XkcdError> {
        match archive {
            Some(a) => Ok(Cow::Borrowed(a)),
            None => Ok(Cow::Owned(self.fetch_whatif_archive()?)),
        }
    }

    /// Highest article number. Fails on an empty archive.
    pub fn latest_whatif_number(&self, archive: Option<&WhatIfArchive>) -> Result<u32, XkcdError> {
        let archive = self.archive_or_fetch(archive)?;
        archive
            .keys()
            .next_back()
            .copied()
            .ok_or(XkcdError::EmptyArchive)
    }

    /// Article with the highest number. Fails on an empty archive.
    pub fn latest_whatif(&self, archive: Option<&WhatIfArchive>) -> Result<WhatIf, XkcdError> {
        let archive = self.archive_or_fetch(archive)?;
        archive
            .values()
            .next_back()
            .cloned()
            .ok_or(XkcdError::EmptyArchive)
    }

    /// Uniformly random article among those present; gaps in the numbering are skipped.
    pub fn random_whatif(&self, archive: Option<&WhatIfArchive>) -> Result<WhatIf, XkcdError> {
        let archive = self.archive_or_fetch(archive)?;
        if archive.is_empty() {
            return Err(XkcdError::EmptyArchive);
        }
        let index = rand::rng().random_range(0..archive.len());
        archive
            .values()
            .nth(index)
            .cloned()
            .ok_or(XkcdError::EmptyArchive)
    }

    /// Article by number; `None` when above the latest, non-positive, or missing from the archive.
    pub fn whatif_by_number(
        &self,
        number: i64,
        archive: Option<&WhatIfArchive>,
    ) -> Result<Option<WhatIf>, XkcdError> {
        let archive = self.archive_or_fetch(archive)?;
        let latest = archive.keys().next_back().copied().unwrap_or(0);
        if latest == 0 || number > i64::from(latest) {
            return Ok(None);
        }
        Ok(u32::try_from(number)
            .ok()
            .and_then(|n| archive.get(&n))
            .cloned())
    }
}
