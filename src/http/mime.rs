//! MIME type detection module
//!
//! Maps a request URL's file extension to the `Content-Type` a static file is
//! served with. Extensions outside the table are not served.

/// Content type for HTML pages and for 404 forwards
pub const TEXT_HTML_UTF8: &str = "text/html; charset=UTF-8";

/// Last path segment of a URL
///
/// # Examples
/// ```
/// use rust_servlet::http::mime::file_name;
/// assert_eq!(file_name("/config/CPPWeb.ini"), "CPPWeb.ini");
/// assert_eq!(file_name("/"), "");
/// ```
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Lowercased extension of the URL's last path segment
///
/// Dots in directory names are ignored; a trailing dot yields `None`.
pub fn file_extension(url: &str) -> Option<String> {
    let (_, ext) = file_name(url).rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Get MIME Content-Type for a lowercased file extension
///
/// # Examples
/// ```
/// use rust_servlet::http::mime::get_content_type;
/// assert_eq!(get_content_type("html"), Some("text/html; charset=UTF-8"));
/// assert_eq!(get_content_type("pdf"), Some("application/pdf"));
/// assert_eq!(get_content_type("xyz"), None);
/// ```
pub fn get_content_type(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => TEXT_HTML_UTF8,
        "css" => "text/css; charset=UTF-8",
        "txt" => "text/plain; charset=UTF-8",
        "php" => "text/php; charset=UTF-8",
        "ini" => "text/ini; charset=UTF-8",

        // Images
        "ico" => "image/vnd.microsoft.icon",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "jpe" | "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "svg" | "svgz" => "image/svg+xml",
        "psd" => "image/vnd.adobe.photoshop",

        // Structured data and archives
        "pdf" => "application/pdf",
        "xml" => "application/xml",
        "json" => "application/json",
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "cab" => "application/vnd.ms-cab-compressed",

        // Audio/Video
        "mp3" => "audio/mp3",
        "mp4" => "audio/mp4",
        "flv" => "video/flv",

        // Office documents
        "doc" => "application/msword",
        "rtf" => "application/rtf",
        "xls" => "application/vnd.ms-excel",
        "ppt" => "application/vnd.ms-powerpoint",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "ai" | "eps" | "ps" => "application/postscript",

        // Executables and scripts
        "js" => "application/javascript",
        "swf" => "application/x-shockwave-flash",
        "exe" | "msi" => "application/x-msdownload",

        _ => return None,
    };
    Some(content_type)
}

/// Content type for a URL, `None` when the extension is missing or unknown
pub fn content_type_for_url(url: &str) -> Option<&'static str> {
    get_content_type(&file_extension(url)?)
}
