//! Filename sanitization for listing-derived names.

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Remove invalid characters from a candidate filename.
///
/// Characters are removed outright, not replaced; the relative order of the
/// remaining characters is preserved. An empty result means the name is
/// unusable and the caller should drop the task.
pub fn sanitize_filename(name: &str) -> String {
    name.chars().filter(|c| !INVALID_CHARS.contains(c)).collect()
}
