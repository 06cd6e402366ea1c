use log::info;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::sites::{Batoto, SiteAdapter, Starkana};

/// Supported sites in matching order. Patterns are disjoint by hostname, so
/// the order only matters for readability.
static SITES: Lazy<Vec<Box<dyn SiteAdapter>>> =
    Lazy::new(|| vec![Box::new(Batoto::new()), Box::new(Starkana::new())]);

pub fn sites() -> impl Iterator<Item = &'static dyn SiteAdapter> {
    SITES.iter().map(|site| site.as_ref())
}

/// Picks the adapter for an index URL; the first matching site wins.
pub fn route(url: &str) -> Result<&'static dyn SiteAdapter> {
    let url = url.trim();
    let site = sites()
        .find(|site| site.matches(url))
        .ok_or_else(|| Error::UnsupportedSite(url.to_string()))?;
    info!("Site supported: {}", site.name());
    Ok(site)
}
