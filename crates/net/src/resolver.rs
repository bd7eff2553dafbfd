//! Maps identifiers to object URLs in the remote store

use docaudit_errors::{Error, NetworkError};

use crate::parse_url;

/// Builds `<base>/<identifier><suffix>` URLs
#[derive(Debug, Clone)]
pub struct ObjectUrlResolver {
    base: String,
    suffix: String,
}

impl ObjectUrlResolver {
    /// Create a resolver for a base location
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, suffix: impl Into<String>) -> Result<Self, Error> {
        let parsed = parse_url(base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(format!("{base_url} cannot be a base URL")).into());
        }

        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            base,
            suffix: suffix.into(),
        })
    }

    /// Resolve an identifier to its object URL
    ///
    /// Every path segment is percent-encoded; `/` inside the identifier is
    /// kept as a separator.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> String {
        let object_name = format!("{identifier}{}", self.suffix);
        let encoded = object_name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}{encoded}", self.base)
    }
}
