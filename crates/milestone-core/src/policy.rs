//! Which remote image URLs the page is willing to embed.

use url::Url;

use crate::Result;

pub const DEFAULT_STORAGE_HOST_SUFFIX: &str = "supabase.co";
pub const STORAGE_PATH_PREFIX: &str = "/storage/v1/object/";

/// Trusted storage origin: `https://*.{host_suffix}/storage/v1/object/**`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePolicy {
  host_suffix: String,
}

impl Default for StoragePolicy {
  fn default() -> Self { Self::new(DEFAULT_STORAGE_HOST_SUFFIX) }
}

impl StoragePolicy {
  pub fn new(host_suffix: impl Into<String>) -> Self {
    let host_suffix = host_suffix.into();
    Self {
      host_suffix: host_suffix.trim_start_matches('.').to_ascii_lowercase(),
    }
  }

  /// Parse `uri` and check it against the policy.
  pub fn check(&self, uri: &str) -> Result<bool> {
    let url = Url::parse(uri)?;
    Ok(self.allows_url(&url))
  }

  /// `true` when `uri` parses and points into trusted storage.
  pub fn allows(&self, uri: &str) -> bool {
    self.check(uri).unwrap_or(false)
  }

  fn allows_url(&self, url: &Url) -> bool {
    if url.scheme() != "https" {
      return false;
    }
    // At least one label must precede the suffix.
    let host_ok = url.host_str().is_some_and(|host| {
      host
        .strip_suffix(self.host_suffix.as_str())
        .is_some_and(|rest| rest.len() > 1 && rest.ends_with('.'))
    });
    host_ok && url.path().starts_with(STORAGE_PATH_PREFIX)
  }
}
