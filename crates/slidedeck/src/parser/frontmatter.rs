use serde::Deserialize;

use super::PresentationMeta;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMeta {
    title: Option<String>,
    theme: Option<String>,
    footer: Option<String>,
    banner: Option<String>,
    counter: Option<bool>,
    controls: Option<bool>,
}

/// Split a leading `---` YAML block off the document.
///
/// Returns the parsed metadata and the remaining body. A document without a
/// frontmatter block yields default metadata and the whole input as body.
pub fn extract(content: &str) -> Result<(PresentationMeta, String), serde_yaml::Error> {
    let content = content.replace("\r\n", "\n");
    let Some(rest) = content.strip_prefix("---\n") else {
        return Ok((PresentationMeta::default(), content));
    };

    let Some(end) = find_closing_fence(rest) else {
        return Ok((PresentationMeta::default(), content));
    };

    let yaml = &rest[..end];
    let body = rest[end..]
        .split_once('\n')
        .map(|(_, b)| b)
        .unwrap_or("")
        .to_string();

    let raw: RawMeta = if yaml.trim().is_empty() {
        RawMeta::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let meta = PresentationMeta {
        title: raw.title,
        theme: raw.theme,
        footer: raw.footer,
        banner: raw.banner,
        counter: raw.counter.unwrap_or(true),
        controls: raw.controls.unwrap_or(true),
    };
    Ok((meta, body))
}

/// Byte offset of the line holding the closing `---`.
fn find_closing_fence(rest: &str) -> Option<usize> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}
