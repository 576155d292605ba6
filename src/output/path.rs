use crate::config::OutputFormat;
use crate::output::is_html;
use crate::url::{authority, normalize_path};
use crate::{UrlError, UrlResult};
use std::path::{Path, PathBuf};
use url::Url;

/// Maps a canonical URL to its file inside the output directory
///
/// # Mapping Rules
///
/// | URL path | HTML, `html` format | HTML, `markdown` format | other content |
/// |----------|---------------------|-------------------------|---------------|
/// | `/` or `/dir/` | `dir/index.html` | `dir/index.md` | `dir/index.html` |
/// | `/dir/page` | `dir/page/index.html` | `dir/page/index.md` | `dir/page/index.html` |
/// | `/dir/page.html` | `dir/page.html` | `dir/page.md` | `dir/page.html` |
/// | `/img/logo.png` | | | `img/logo.png` |
///
/// The path keeps its percent-encoding, so the mapping is deterministic.
/// `/dir/page` and `/dir/page/` map to the same index file; whichever is written last
/// wins.
///
/// # Errors
///
/// Returns `UrlError::HostMismatch` if the URL is not on `allowed_authority`.
pub fn output_path(
    output_dir: &Path,
    url: &Url,
    allowed_authority: &str,
    format: OutputFormat,
    content_type: &str,
) -> UrlResult<PathBuf> {
    let found = authority(url).unwrap_or_default();
    if found != allowed_authority {
        return Err(UrlError::HostMismatch {
            expected: allowed_authority.to_string(),
            found,
        });
    }

    let converted = format == OutputFormat::Markdown && is_html(content_type);
    let index_name = if converted { "index.md" } else { "index.html" };

    let path = normalize_path(url.path());
    let relative = PathBuf::from(path.trim_start_matches('/'));

    let relative = if path.ends_with('/') || relative.extension().is_none() {
        relative.join(index_name)
    } else if converted {
        relative.with_extension("md")
    } else {
        relative
    };

    Ok(output_dir.join(relative))
}
