//! Folder path and object key construction.
//!
//! A folder stores the slash-joined names of its ancestors in `path`; its
//! own name is appended only when it becomes the parent of something
//! ([`full_location`]). A file's object key nests the file id under that
//! location so that same-named files never collide.
//!
//! Everything here is pure: no I/O and no failure modes.

/// Characters never allowed in a stored file name, in addition to ASCII
/// control characters.
const INVALID_FILE_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Replacement used when sanitizing leaves nothing behind.
const FALLBACK_FILE_NAME: &str = "unnamed";

/// The location a folder gives to its direct children.
pub fn full_location(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}/{name}")
    }
}

/// Split a path into its non-empty segments.
pub fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Depth of a folder whose ancestor path is `path` (roots are at depth 0).
pub fn depth(path: &str) -> usize {
    path.split('/').filter(|segment| !segment.is_empty()).count()
}

/// Breadcrumb trail of a folder: its ancestors followed by its own name.
pub fn breadcrumbs(path: &str, name: &str) -> Vec<String> {
    split_segments(&full_location(path, name))
}

/// Id-qualified object key: `{folder_path}/{file_id}/{name}` or
/// `{file_id}/{name}` at the root.
pub fn build_object_key(
    folder_path: Option<&str>,
    file_id: impl std::fmt::Display,
    file_name: &str,
) -> String {
    let name = sanitize_file_name(file_name);
    match folder_path.filter(|p| !p.is_empty()) {
        Some(folder) => format!("{folder}/{file_id}/{name}"),
        None => format!("{file_id}/{name}"),
    }
}

/// Name-only object key: `{folder_path}/{name}` or `{name}` at the root.
///
/// Two uploads of the same name into the same folder map to the same key,
/// so this form is only ever used for the initial upload and only when the
/// deployment opts into it.
pub fn build_object_key_unqualified(folder_path: Option<&str>, file_name: &str) -> String {
    let name = sanitize_file_name(file_name);
    match folder_path.filter(|p| !p.is_empty()) {
        Some(folder) => format!("{folder}/{name}"),
        None => name,
    }
}

/// Replace runs of characters that are invalid in a file name with `_`.
///
/// Leading and trailing invalid characters are dropped rather than
/// replaced. A result made only of dots (`.`, `..`) is not a usable key
/// segment and falls back like an empty one.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized = name
        .split(|c: char| c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c))
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        sanitized
    }
}

/// Split a file name into stem and extension (including the dot).
///
/// A leading dot does not start an extension: `.env` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Name given to a duplicate of `original`.
///
/// Without an explicit name this is `"{stem} - Copy{ext}"`; an explicit name
/// gets the original extension appended unless it already ends with it.
pub fn duplicate_name(original: &str, requested: Option<&str>) -> String {
    let (stem, ext) = split_extension(original);
    match requested {
        None => format!("{stem} - Copy{ext}"),
        Some(name) if name.ends_with(ext) => name.to_string(),
        Some(name) => format!("{name}{ext}"),
    }
}
