//! Asset reference resolution.
//!
//! Image values arrive in several shapes: already resolved (`asset.url`,
//! `url`) or as an opaque id (`id`, `asset.ref`) of the form
//! `image-<assetId>-<width>x<height>-<ext>`.

use super::options::AssetConfig;
use crate::model::value::first_str;
use serde_json::Value;

/// A decoded opaque image asset id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId<'a> {
    /// Asset identifier
    pub id: &'a str,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// File extension
    pub ext: &'a str,
}

impl<'a> AssetId<'a> {
    /// Decode `image-<assetId>-<width>x<height>-<ext>`. Any deviation returns
    /// `None`.
    pub fn parse(reference: &'a str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let mut parts = rest.rsplitn(3, '-');
        let ext = parts.next()?;
        let dimensions = parts.next()?;
        let id = parts.next()?;

        let (width, height) = dimensions.split_once('x')?;
        let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(id) || !valid(ext) || !is_digits(width) || !is_digits(height) {
            return None;
        }

        Some(Self {
            id,
            width: width.parse().ok()?,
            height: height.parse().ok()?,
            ext,
        })
    }

    /// CDN URL for this asset.
    pub fn url(&self, config: &AssetConfig) -> String {
        format!(
            "https://{}/images/{}/{}/{}.{}",
            config.cdn_host, config.project_id, config.dataset, self.id, self.ext
        )
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves image values to absolute URLs.
#[derive(Debug, Clone, Copy)]
pub struct AssetResolver<'a> {
    config: &'a AssetConfig,
}

impl<'a> AssetResolver<'a> {
    /// Create a resolver for the given CDN configuration.
    pub fn new(config: &'a AssetConfig) -> Self {
        Self { config }
    }

    /// Resolve an image value to a URL.
    ///
    /// Tries, in order: `asset.url`, `url`, `id` as an opaque id, and
    /// `asset.ref` as an opaque id. A bare string is accepted as either an
    /// absolute URL or an opaque id. `None` means the image should be omitted.
    pub fn resolve_image_url(&self, value: &Value) -> Option<String> {
        if let Value::String(s) = value {
            return if is_absolute_url(s) {
                Some(s.clone())
            } else {
                self.parse_asset_id(s)
            };
        }

        let asset = value.get("asset");
        let resolved = asset
            .and_then(|a| first_str(a, &["url"]))
            .or_else(|| first_str(value, &["url"]))
            .map(str::to_string)
            .or_else(|| first_str(value, &["id", "_id"]).and_then(|id| self.parse_asset_id(id)))
            .or_else(|| {
                asset
                    .and_then(|a| first_str(a, &["ref", "_ref"]))
                    .and_then(|r| self.parse_asset_id(r))
            });

        if resolved.is_none() {
            log::debug!("Image asset could not be resolved; omitting image");
        }
        resolved
    }

    /// Map an opaque asset id to its CDN URL.
    pub fn parse_asset_id(&self, reference: &str) -> Option<String> {
        let asset = AssetId::parse(reference)?;
        if !self.config.is_configured() {
            log::debug!(
                "Asset {} found but no project/dataset configured",
                reference
            );
            return None;
        }
        Some(asset.url(self.config))
    }
}

fn is_absolute_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}
