//! Extension <-> MIME mapping for the types a shell download realistically
//! meets. Unknown values map to `None`; callers decide the fallback.

pub fn mime_from_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "aac" => "audio/aac",
        "apk" => "application/vnd.android.package-archive",
        "avi" => "video/x-msvideo",
        "bin" => "application/octet-stream",
        "bmp" => "image/bmp",
        "css" => "text/css",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "epub" => "application/epub+zip",
        "gif" => "image/gif",
        "gz" => "application/gzip",
        "heic" => "image/heic",
        "htm" | "html" => "text/html",
        "ico" => "image/x-icon",
        "jpeg" | "jpg" => "image/jpeg",
        "js" => "text/javascript",
        "json" => "application/json",
        "m4a" => "audio/mp4",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "ogg" => "audio/ogg",
        "otf" => "font/otf",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "rar" => "application/vnd.rar",
        "rtf" => "application/rtf",
        "svg" => "image/svg+xml",
        "tar" => "application/x-tar",
        "tif" | "tiff" => "image/tiff",
        "ttf" => "font/ttf",
        "txt" => "text/plain",
        "wav" => "audio/wav",
        "webm" => "video/webm",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "7z" => "application/x-7z-compressed",
        _ => return None,
    };
    Some(mime)
}

pub fn extension_from_mime(mimetype: &str) -> Option<&'static str> {
    // Strip parameters like "; charset=utf-8" before matching.
    let essence = mimetype.split(';').next().unwrap_or(mimetype).trim();
    let extension = match essence.to_ascii_lowercase().as_str() {
        "audio/aac" => "aac",
        "application/vnd.android.package-archive" => "apk",
        "video/x-msvideo" => "avi",
        "application/octet-stream" => "bin",
        "image/bmp" => "bmp",
        "text/css" => "css",
        "text/csv" => "csv",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/epub+zip" => "epub",
        "image/gif" => "gif",
        "application/gzip" => "gz",
        "image/heic" => "heic",
        "text/html" => "html",
        "image/x-icon" => "ico",
        "image/jpeg" => "jpg",
        "text/javascript" => "js",
        "application/json" => "json",
        "audio/mp4" => "m4a",
        "video/x-matroska" => "mkv",
        "video/quicktime" => "mov",
        "audio/mpeg" => "mp3",
        "video/mp4" => "mp4",
        "audio/ogg" => "ogg",
        "font/otf" => "otf",
        "application/pdf" => "pdf",
        "image/png" => "png",
        "application/vnd.ms-powerpoint" => "ppt",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",
        "application/vnd.rar" => "rar",
        "application/rtf" => "rtf",
        "image/svg+xml" => "svg",
        "application/x-tar" => "tar",
        "image/tiff" => "tiff",
        "font/ttf" => "ttf",
        "text/plain" => "txt",
        "audio/wav" => "wav",
        "video/webm" => "webm",
        "image/webp" => "webp",
        "font/woff" => "woff",
        "font/woff2" => "woff2",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/xml" => "xml",
        "application/zip" => "zip",
        "application/x-7z-compressed" => "7z",
        _ => return None,
    };
    Some(extension)
}

/// Gallery saves only apply to image payloads.
pub fn is_image(mimetype: &str) -> bool {
    mimetype.contains("image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extension_maps_to_mime() {
        assert_eq!(mime_from_extension("pdf"), Some("application/pdf"));
        assert_eq!(mime_from_extension("PNG"), Some("image/png"));
    }

    #[test]
    fn unknown_extension_maps_to_none() {
        assert_eq!(mime_from_extension("xyzzy"), None);
    }

    #[test]
    fn mime_with_parameters_maps_to_extension() {
        assert_eq!(extension_from_mime("text/plain; charset=utf-8"), Some("txt"));
    }

    #[test]
    fn unknown_mime_maps_to_none() {
        assert_eq!(extension_from_mime("application/x-custom"), None);
    }

    #[test]
    fn octet_stream_maps_to_bin() {
        assert_eq!(extension_from_mime("application/octet-stream"), Some("bin"));
    }

    #[test]
    fn image_detection() {
        assert!(is_image("image/png"));
        assert!(is_image("image/svg+xml"));
        assert!(!is_image("application/pdf"));
    }
}
