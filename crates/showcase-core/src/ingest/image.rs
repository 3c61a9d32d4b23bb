// Image URL resolution: turn sharing links into directly embeddable URLs.

/// Asset shown when a player has no image.
pub const FALLBACK_IMAGE: &str = "/generic avatar.png";

const DRIVE_HOSTS: [&str; 2] = ["drive.google.com", "docs.google.com"];
const DRIVE_CONTENT_BASE: &str = "https://lh3.googleusercontent.com/d/";
const DROPBOX_HOST: &str = "dropbox.com";

/// Resolve an image cell into a URL an `<img>` tag can load.
///
/// - empty -> [`FALLBACK_IMAGE`]
/// - Drive/Docs sharing link with a `/d/<id>/` segment -> direct content URL
/// - Dropbox link with `dl=0` -> `raw=1`
/// - anything else, including Drive links without an id, unchanged
pub fn transform_image(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return FALLBACK_IMAGE.to_string();
    }

    if DRIVE_HOSTS.iter().any(|host| url.contains(host)) {
        if let Some(id) = drive_file_id(url) {
            return format!("{DRIVE_CONTENT_BASE}{id}");
        }
    }

    if url.contains(DROPBOX_HOST) && url.contains("dl=0") {
        return url.replacen("dl=0", "raw=1", 1);
    }

    url.to_string()
}

/// The `<id>` of the first `/d/<id>/` (or trailing `/d/<id>`) path segment.
fn drive_file_id(url: &str) -> Option<&str> {
    let start = url.find("/d/")? + "/d/".len();
    let rest = &url[start..];
    let id = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };
    (!id.is_empty()).then_some(id)
}
