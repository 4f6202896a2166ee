//! Rendering options and configuration.

use super::CleanupOptions;
use crate::error::{Error, Result};

/// Default maximum length (in characters) of a string accepted by generic
/// text extraction. Longer strings are dropped.
pub const DEFAULT_MAX_LEAF_LENGTH: usize = 500;

/// Default recursion cap for generic text extraction.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Options for rendering a document to Markdown.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Site base URL that root-relative links are resolved against
    /// (e.g., "https://example.com"). Empty leaves links untouched.
    pub site_url: String,

    /// Asset CDN settings for resolving opaque asset ids
    pub asset: AssetConfig,

    /// Longest string (in characters, exclusive) kept by generic extraction
    pub max_leaf_length: usize,

    /// Deepest nesting level visited by generic extraction
    pub max_depth: usize,

    /// Heading for the child entry index of listing documents
    pub listing_heading: String,

    /// Path prefix for child entry slugs (e.g., "/blog")
    pub listing_base_path: String,

    /// Escape Markdown control characters in span text
    pub escape_special_chars: bool,

    /// Post-processing options
    pub cleanup: CleanupOptions,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the site base URL.
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// Set the asset CDN configuration.
    pub fn with_asset_config(mut self, asset: AssetConfig) -> Self {
        self.asset = asset;
        self
    }

    /// Set the CDN host.
    pub fn with_cdn_host(mut self, host: impl Into<String>) -> Self {
        self.asset.cdn_host = host.into();
        self
    }

    /// Set the asset project and dataset.
    pub fn with_project(mut self, project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        self.asset.project_id = project_id.into();
        self.asset.dataset = dataset.into();
        self
    }

    /// Set the generic extraction leaf length limit.
    pub fn with_max_leaf_length(mut self, length: usize) -> Self {
        self.max_leaf_length = length;
        self
    }

    /// Set the generic extraction depth limit.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the listing index heading.
    pub fn with_listing_heading(mut self, heading: impl Into<String>) -> Self {
        self.listing_heading = heading.into();
        self
    }

    /// Set the listing entry path prefix.
    pub fn with_listing_base_path(mut self, path: impl Into<String>) -> Self {
        self.listing_base_path = path.into();
        self
    }

    /// Enable or disable Markdown escaping of span text.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Check the options for values the renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.site_url.is_empty()
            && !(self.site_url.starts_with("https://") || self.site_url.starts_with("http://"))
        {
            return Err(Error::InvalidConfig(format!(
                "site URL must start with http:// or https://, got {:?}",
                self.site_url
            )));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth must be at least 1".into()));
        }
        if self.max_leaf_length == 0 {
            return Err(Error::InvalidConfig(
                "max_leaf_length must be at least 1".into(),
            ));
        }
        if self.asset.cdn_host.contains('/') {
            return Err(Error::InvalidConfig(format!(
                "CDN host must be a bare host name, got {:?}",
                self.asset.cdn_host
            )));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            asset: AssetConfig::default(),
            max_leaf_length: DEFAULT_MAX_LEAF_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            listing_heading: "Contents".to_string(),
            listing_base_path: String::new(),
            escape_special_chars: false,
            cleanup: CleanupOptions::default(),
        }
    }
}

/// Where opaque asset ids resolve to:
/// `https://<cdn_host>/images/<project_id>/<dataset>/<asset>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetConfig {
    /// CDN host name
    pub cdn_host: String,

    /// Content store project identifier
    pub project_id: String,

    /// Content store dataset
    pub dataset: String,
}

impl AssetConfig {
    /// Create an asset configuration on the default CDN host.
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            ..Self::default()
        }
    }

    /// Whether project and dataset are both set.
    pub fn is_configured(&self) -> bool {
        !self.cdn_host.is_empty() && !self.project_id.is_empty() && !self.dataset.is_empty()
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cdn_host: "cdn.sanity.io".to_string(),
            project_id: String::new(),
            dataset: "production".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_site_url("https://example.com")
            .with_project("abc", "staging")
            .with_max_depth(3)
            .with_listing_heading("Posts");

        assert_eq!(options.site_url, "https://example.com");
        assert_eq!(options.asset.project_id, "abc");
        assert_eq!(options.asset.dataset, "staging");
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.max_leaf_length, DEFAULT_MAX_LEAF_LENGTH);
        assert_eq!(options.listing_heading, "Posts");
    }

    #[test]
    fn test_validate() {
        assert!(RenderOptions::default().validate().is_ok());
        assert!(RenderOptions::new()
            .with_site_url("https://example.com")
            .validate()
            .is_ok());
        assert!(matches!(
            RenderOptions::new().with_site_url("example.com").validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(RenderOptions::new().with_max_depth(0).validate().is_err());
        assert!(RenderOptions::new().with_max_leaf_length(0).validate().is_err());
        assert!(RenderOptions::new()
            .with_cdn_host("https://cdn.example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_asset_config() {
        assert!(!AssetConfig::default().is_configured());
        let config = AssetConfig::new("proj", "production");
        assert_eq!(config.cdn_host, "cdn.sanity.io");
        assert!(config.is_configured());
    }
}
