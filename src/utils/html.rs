use std::collections::HashSet;

/// Strips markup from user-supplied display text before it is stored.
///
/// Tags are removed outright, `<script>`/`<style>` together with their content.
/// The serializer escapes what is left, so those entities are decoded again and
/// the stored value is the plain text the student typed. Subject and topic labels
/// are not cleaned because analytics group on their exact stored text.
pub fn clean_text(input: &str) -> String {
    let mut builder = ammonia::Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    let escaped = builder.clean(input).to_string();

    // `&amp;` goes last so an escaped entity like `&amp;lt;` stays literal.
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
