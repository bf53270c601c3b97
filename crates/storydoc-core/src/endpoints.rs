//! Service endpoint derivation.

use crate::error::{Result, StorydocError};
use crate::file::UploadChannel;

/// Path of the generate endpoint relative to the base URL.
pub const GENERATE_SUFFIX: &str = "/generate";

/// The three endpoints of the generation service, derived from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base_url: String,
}

impl ServiceEndpoints {
    /// Validates `base_url` and builds the endpoint set.
    ///
    /// A missing scheme or an empty value is a configuration error; it is
    /// reported here so it never surfaces later as a malformed request URL.
    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(StorydocError::config(
                "service base URL is empty; set API_BASE_URL or pass --base-url",
            ));
        }

        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .ok_or_else(|| {
                StorydocError::config(format!(
                    "service base URL '{trimmed}' must start with http:// or https://"
                ))
            })?;
        if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
            return Err(StorydocError::config(format!(
                "service base URL '{trimmed}' has no valid host"
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload(&self, channel: UploadChannel) -> String {
        format!("{}{}", self.base_url, channel.endpoint_suffix())
    }

    pub fn generate(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_SUFFIX)
    }
}
