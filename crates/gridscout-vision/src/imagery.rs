//! Static satellite imagery URL construction.
//!
//! The vision model accepts an image URL directly, so no image bytes
//! transit this service; each grid cell is rendered as a signed static-map
//! URL centered on the cell.

use reqwest::Url;

use gridscout_core::GeoPoint;

use crate::error::VisionError;

const DEFAULT_IMAGERY_BASE: &str = "https://maps.googleapis.com/";
const STATIC_MAP_PATH: &str = "maps/api/staticmap";

/// Zoom 18 puts a typical distribution substation yard within one frame.
pub const SATELLITE_ZOOM: u8 = 18;
pub const IMAGE_SIZE: &str = "640x640";

/// Builds a static satellite image URL centered on `point`.
///
/// Pass `None` for `base_url` to target the production imagery host.
///
/// # Errors
///
/// Returns [`VisionError::InvalidUrl`] if `base_url` cannot be parsed.
pub fn satellite_image_url(
    base_url: Option<&str>,
    api_key: &str,
    point: GeoPoint,
) -> Result<Url, VisionError> {
    let base = base_url.unwrap_or(DEFAULT_IMAGERY_BASE);
    let normalised = format!("{}/", base.trim_end_matches('/'));
    let mut url = Url::parse(&normalised)
        .and_then(|u| u.join(STATIC_MAP_PATH))
        .map_err(|e| VisionError::InvalidUrl(format!("{base}: {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("center", &format!("{},{}", point.lat, point.lng));
        pairs.append_pair("zoom", &SATELLITE_ZOOM.to_string());
        pairs.append_pair("size", IMAGE_SIZE);
        pairs.append_pair("maptype", "satellite");
        pairs.append_pair("key", api_key);
    }
    Ok(url)
}
