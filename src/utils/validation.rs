use crate::error::{Error, Result};
use url::Url;
use validator::Validate;

pub fn validate<T: Validate>(val: &T) -> std::result::Result<(), validator::ValidationErrors> {
    val.validate()
}

/// Parses an API base URL, making sure relative joins keep its path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    let url = Url::parse(&raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "unsupported scheme '{}' in {}",
            url.scheme(),
            raw
        )));
    }
    Ok(url)
}

/// Appends path segments to `base`. Each segment is percent-encoded, so an id
/// containing `/`, `?` or `#` stays one segment.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("{} cannot be used as a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
