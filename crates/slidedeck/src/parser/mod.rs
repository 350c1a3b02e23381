pub mod frontmatter;
pub mod splitter;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DeckError;
use splitter::Fence;

#[derive(Debug, Clone)]
pub struct Presentation {
    pub meta: PresentationMeta,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationMeta {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub footer: Option<String>,
    /// Informational box shown in the top-right corner. The navigation
    /// controls are positioned beneath it.
    pub banner: Option<String>,
    /// Render the "current / total" counter.
    pub counter: bool,
    /// Render the previous/next buttons.
    pub controls: bool,
}

impl Default for PresentationMeta {
    fn default() -> Self {
        Self {
            title: None,
            theme: None,
            footer: None,
            banner: None,
            counter: true,
            controls: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// One list entry. Items are the animatable elements of a slide.
    Item { ordinal: Option<u32>, text: String },
    Quote { text: String },
    Code { language: Option<String>, code: String },
}

impl Slide {
    /// Number of blocks that take part in the entry animation.
    pub fn item_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Item { .. }))
            .count()
    }

    pub fn title(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("valid regex"));
static ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|(\d+)[.)])\s+(.+)$").expect("valid regex"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s?(.*)$").expect("valid regex"));

/// Read and parse a deck file.
pub fn load(path: &Path) -> Result<Presentation, DeckError> {
    let content = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let presentation = parse(&content)?;
    if presentation.slides.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(presentation)
}

pub fn parse(content: &str) -> Result<Presentation, DeckError> {
    let (meta, body) = frontmatter::extract(content)?;
    let slides = splitter::split(&body)
        .into_iter()
        .map(|raw| Slide {
            blocks: parse_blocks(&raw),
        })
        .collect();
    Ok(Presentation { meta, slides })
}

fn parse_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut quote: Vec<&str> = Vec::new();
    let mut lines = raw.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if !QUOTE.is_match(trimmed) {
            flush_joined(&mut quote, &mut blocks, |text| Block::Quote { text });
        }

        if let Some(fence) = Fence::opening(trimmed) {
            flush_joined(&mut paragraph, &mut blocks, |text| Block::Paragraph { text });
            let info = trimmed.trim_start_matches(fence.marker).trim();
            let language = Some(info.to_string()).filter(|l| !l.is_empty());
            let code: Vec<&str> = lines
                .by_ref()
                .take_while(|l| !fence.closes(l.trim()))
                .collect();
            blocks.push(Block::Code {
                language,
                code: code.join("\n"),
            });
            continue;
        }

        if trimmed.is_empty() {
            flush_joined(&mut paragraph, &mut blocks, |text| Block::Paragraph { text });
            continue;
        }

        if let Some(caps) = HEADING.captures(trimmed) {
            flush_joined(&mut paragraph, &mut blocks, |text| Block::Paragraph { text });
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].trim().to_string(),
            });
        } else if let Some(caps) = ITEM.captures(line) {
            flush_joined(&mut paragraph, &mut blocks, |text| Block::Paragraph { text });
            blocks.push(Block::Item {
                ordinal: caps.get(1).and_then(|m| m.as_str().parse().ok()),
                text: caps[2].trim().to_string(),
            });
        } else if let Some(caps) = QUOTE.captures(trimmed) {
            flush_joined(&mut paragraph, &mut blocks, |text| Block::Paragraph { text });
            quote.push(caps.get(1).map_or("", |m| m.as_str()));
        } else {
            paragraph.push(trimmed);
        }
    }

    flush_joined(&mut quote, &mut blocks, |text| Block::Quote { text });
    flush_joined(&mut paragraph, &mut blocks, |text| Block::Paragraph { text });
    blocks
}

fn flush_joined(
    lines: &mut Vec<&str>,
    blocks: &mut Vec<Block>,
    make: impl FnOnce(String) -> Block,
) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join(" ").trim().to_string();
    lines.clear();
    if !text.is_empty() {
        blocks.push(make(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_deck_parses() {
        let content = include_str!("../../../../sample-presentations/network-tour.md");
        let pres = parse(content).unwrap();
        assert_eq!(pres.meta.theme.as_deref(), Some("network"));
        assert!(pres.meta.banner.is_some());
        assert_eq!(pres.slides.len(), 6);
        assert_eq!(pres.slides[0].title(), Some("Network Infrastructure Tour"));
        assert!(pres.slides.iter().any(|s| s.item_count() >= 3));
    }

    #[test]
    fn test_blocks() {
        let pres = parse("# Topology\n\nCore and edge\nlayers.\n\n- Router\n- Switch\n1. First\n\n> quoted\n> text").unwrap();
        assert_eq!(
            pres.slides[0].blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: "Topology".into()
                },
                Block::Paragraph {
                    text: "Core and edge layers.".into()
                },
                Block::Item {
                    ordinal: None,
                    text: "Router".into()
                },
                Block::Item {
                    ordinal: None,
                    text: "Switch".into()
                },
                Block::Item {
                    ordinal: Some(1),
                    text: "First".into()
                },
                Block::Quote {
                    text: "quoted text".into()
                },
            ]
        );
        assert_eq!(pres.slides[0].item_count(), 3);
    }

    #[test]
    fn test_code_block_is_not_parsed_as_items() {
        let pres = parse("# Config\n\n```yaml\n- name: core\n- name: edge\n```").unwrap();
        let slide = &pres.slides[0];
        assert_eq!(slide.item_count(), 0);
        assert!(matches!(
            &slide.blocks[1],
            Block::Code { language: Some(l), code } if l == "yaml" && code.lines().count() == 2
        ));
    }

    #[test]
    fn test_tilde_fence_is_code() {
        let pres = parse("# Config\n\n~~~\n- name: core\n# comment\n~~~\n\n- after").unwrap();
        let slide = &pres.slides[0];
        assert_eq!(slide.item_count(), 1);
        assert_eq!(slide.blocks.len(), 3);
        assert!(matches!(
            &slide.blocks[1],
            Block::Code { language: None, code } if code == "- name: core\n# comment"
        ));
    }

    #[test]
    fn test_longer_fence_needs_matching_close() {
        let pres = parse("# Docs\n\n````md\n```\n- inner\n```\n````").unwrap();
        let slide = &pres.slides[0];
        assert_eq!(slide.item_count(), 0);
        assert!(matches!(
            &slide.blocks[1],
            Block::Code { language: Some(l), code } if l == "md" && code.lines().count() == 3
        ));
    }

    #[test]
    fn test_multiple_slides() {
        let pres = parse("# Slide One\n\nContent\n\n---\n\n# Slide Two\n\nMore content").unwrap();
        assert_eq!(pres.slides.len(), 2);
        assert_eq!(pres.slides[1].title(), Some("Slide Two"));
    }

    #[test]
    fn test_load_rejects_empty_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.md");
        std::fs::write(&path, "---\ntitle: Nothing\n---\n\n").unwrap();
        assert!(matches!(load(&path), Err(DeckError::Empty)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, DeckError::Read { .. }));
    }
}
