/// Media types accepted in place of a `.md` file name.
const ACCEPTED_MEDIA_TYPES: &[&str] = &["text/markdown", "text/plain"];

fn strip_md_suffix(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(3)?;
    let (stem, suffix) = (file_name.get(..split)?, file_name.get(split..)?);
    suffix.eq_ignore_ascii_case(".md").then_some(stem)
}

/// Whether a file may be imported: a `.md` name, or a Markdown or plain-text
/// media type.
pub fn is_accepted_source(file_name: &str, media_type: Option<&str>) -> bool {
    strip_md_suffix(file_name).is_some()
        || media_type.is_some_and(|t| ACCEPTED_MEDIA_TYPES.contains(&t))
}

/// Title to use for a file whose contents are blank.
pub fn title_fallback_for(file_name: &str) -> &str {
    strip_md_suffix(file_name).unwrap_or(file_name)
}
