use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::core::mime;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Name used when nothing better can be derived.
const DEFAULT_FILENAME: &str = "downloadfile";

/// Stem used when a name degenerates to its own extension (dotfiles).
const DEGENERATE_STEM: &str = "download";

/// Outcome of filename resolution: the stem and extension the output file
/// will be composed from, plus the possibly re-derived MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub stem: String,
    pub extension: String,
    pub mimetype: Option<String>,
}

/// Resolution for an explicitly supplied filename. The extension is the
/// last `.`-separated segment; a missing extension is derived from the MIME
/// type, and a dotfile collapses to the literal stem `download`. In the
/// normal split the MIME type is re-derived from the extension.
pub fn resolve_explicit(filename: &str, mimetype: Option<&str>) -> ResolvedName {
    match filename.rfind('.') {
        None => ResolvedName {
            stem: filename.to_string(),
            extension: mimetype
                .and_then(mime::extension_from_mime)
                .unwrap_or_default()
                .to_string(),
            mimetype: mimetype.map(str::to_string),
        },
        Some(0) => ResolvedName {
            stem: DEGENERATE_STEM.to_string(),
            extension: filename[1..].to_string(),
            mimetype: mimetype.map(str::to_string),
        },
        Some(pos) => {
            let extension = filename[pos + 1..].to_string();
            let mimetype = mime::mime_from_extension(&extension)
                .map(str::to_string)
                .or_else(|| mimetype.map(str::to_string));
            ResolvedName {
                stem: filename[..pos].to_string(),
                extension,
                mimetype,
            }
        }
    }
}

/// Resolution when no filename was supplied: guess one from the URL, the
/// Content-Disposition header and the MIME type, then split at the last dot.
pub fn resolve_guessed(
    url: &str,
    content_disposition: Option<&str>,
    mimetype: Option<&str>,
) -> ResolvedName {
    let guessed = guess_file_name(url, content_disposition, mimetype);
    let (stem, extension) = match guessed.rfind('.') {
        None => (guessed, String::new()),
        Some(0) => (DEGENERATE_STEM.to_string(), guessed[1..].to_string()),
        Some(pos) => (guessed[..pos].to_string(), guessed[pos + 1..].to_string()),
    };
    let mimetype = if extension.is_empty() {
        mimetype.map(str::to_string)
    } else {
        mime::mime_from_extension(&extension)
            .map(str::to_string)
            .or_else(|| mimetype.map(str::to_string))
    };
    ResolvedName {
        stem,
        extension,
        mimetype,
    }
}

/// Guess a filename from the Content-Disposition header, falling back to the
/// last URL path segment, then to a fixed default. Appends an extension
/// derived from the MIME type when the guess has none.
pub fn guess_file_name(
    url: &str,
    content_disposition: Option<&str>,
    mimetype: Option<&str>,
) -> String {
    let name = content_disposition
        .and_then(filename_from_content_disposition)
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let name = sanitize_path_component(&name);
    let name = if name.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        name
    };

    if !name.contains('.') {
        if let Some(extension) = mimetype.and_then(mime::extension_from_mime) {
            return format!("{name}.{extension}");
        }
    }
    name
}

fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    let decoded = urlencoding::decode(segment).ok()?;
    let decoded = decoded.trim();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.to_string())
    }
}

fn filename_from_content_disposition(value: &str) -> Option<String> {
    let mut filename_star: Option<String> = None;
    let mut filename: Option<String> = None;

    for part in value.split(';') {
        let part = part.trim();
        let lower = part.to_ascii_lowercase();
        if lower.starts_with("filename*=") {
            // RFC 5987: charset'language'percent-encoded-value
            let raw = part["filename*=".len()..].trim().trim_matches('"');
            let encoded = raw.rsplit('\'').next().unwrap_or(raw);
            if let Ok(decoded) = urlencoding::decode(encoded) {
                let decoded = decoded.trim();
                if !decoded.is_empty() {
                    filename_star = Some(decoded.to_string());
                }
            }
        } else if lower.starts_with("filename=") {
            let raw = part["filename=".len()..].trim().trim_matches('"');
            if !raw.is_empty() {
                filename = Some(raw.to_string());
            }
        }
    }

    let name = filename_star.or(filename)?;
    // Headers can smuggle path components; only the last segment counts.
    let name = name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Normalizes and strips a candidate name down to a single safe path
/// component: NFC form, collapsed whitespace, no separators or
/// filesystem-hostile characters.
pub fn sanitize_path_component(name: &str) -> String {
    let name: String = name.nfc().collect();
    let name = name.replace(['\t', '\n', '\r'], " ");
    let name = WS_RE.replace_all(name.trim(), " ");
    sanitize_filename::sanitize(name.as_ref())
        .trim()
        .to_string()
}
