use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::SystemTime;

use async_trait::async_trait;
use regex::Regex;

use crate::errors::KnowledgeResult;
use crate::models::{Block, Table};
use crate::sources::{DocumentSource, file_modified, not_found_as_unavailable};

static IMAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[[^\]]*\]\([^)]*\)$").expect("regex"));
static TABLE_SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("regex"));
static STRONG_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__").expect("regex"));

/// Markdown (or plain text) playbook on disk.
#[derive(Debug, Clone)]
pub struct MarkdownSource {
    path: PathBuf,
}

impl MarkdownSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for MarkdownSource {
    async fn modified(&self) -> KnowledgeResult<SystemTime> {
        file_modified(&self.path).await
    }

    async fn read_blocks(&self) -> KnowledgeResult<Vec<Block>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| not_found_as_unavailable(err, &self.path))?;
        Ok(parse_markdown(&raw))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Split markdown into blocks.
///
/// `#` headings open main topics and deeper headings open sub-topics.
/// Consecutive `|` lines form a table, image-only lines become drawings and
/// blank lines end paragraphs. A paragraph opening with `**` or `__` is
/// marked as starting with a bold run.
pub fn parse_markdown(input: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    let mut in_fence = false;

    for line in input.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            if in_fence {
                builder.paragraph.push(line.to_string());
                builder.flush_paragraph();
            } else {
                builder.flush();
                builder.paragraph.push(line.to_string());
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            builder.paragraph.push(line.to_string());
            continue;
        }

        if trimmed.is_empty() {
            builder.flush();
            continue;
        }

        if let Some((level, title)) = parse_heading(trimmed) {
            builder.flush();
            let block = if level == 1 {
                Block::Heading1(title)
            } else {
                Block::SubHeading(title)
            };
            builder.blocks.push(block);
            continue;
        }

        if trimmed.starts_with('|') {
            builder.flush_paragraph();
            let cells = split_row(trimmed);
            if !is_separator_row(&cells) {
                builder.table.push(cells);
            }
            continue;
        }

        if IMAGE_LINE.is_match(trimmed) {
            builder.flush();
            builder.blocks.push(Block::Drawing);
            continue;
        }

        builder.flush_table();
        builder.paragraph.push(trimmed.to_string());
    }

    builder.flush();
    builder.blocks
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    table: Vec<Vec<String>>,
}

impl BlockBuilder {
    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_table();
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.paragraph);
        let is_code = lines.first().is_some_and(|line| {
            let line = line.trim_start();
            line.starts_with("```") || line.starts_with("~~~")
        });
        if is_code {
            self.blocks.push(Block::paragraph(lines.join("\n")));
            return;
        }

        let joined = lines.join(" ");
        let lead_bold = joined.starts_with("**") || joined.starts_with("__");
        let text = STRONG_MARKER.replace_all(&joined, "").trim().to_string();
        self.blocks.push(Block::Paragraph { text, lead_bold });
    }

    fn flush_table(&mut self) {
        if self.table.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.table);
        self.blocks.push(Block::Table(Table::new(rows)));
    }
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    if !line.starts_with('#') {
        return None;
    }
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim();
    if title.is_empty() {
        None
    } else {
        Some((hashes, title.to_string()))
    }
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|cell| TABLE_SEPARATOR_CELL.is_match(cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_headings_by_level() {
        let blocks = parse_markdown("# GA4 Limits\n\n## Retention\n\n### Deep\n#hashtag");
        assert_eq!(
            blocks,
            vec![
                Block::Heading1("GA4 Limits".to_string()),
                Block::SubHeading("Retention".to_string()),
                Block::SubHeading("Deep".to_string()),
                Block::paragraph("#hashtag"),
            ]
        );
    }

    #[test]
    fn joins_paragraph_lines_and_detects_bold_lead() {
        let blocks = parse_markdown("**Data retention**\n\nEvent data is kept\nfor 14 months.");
        assert_eq!(
            blocks,
            vec![
                Block::bold("Data retention"),
                Block::paragraph("Event data is kept for 14 months."),
            ]
        );
    }

    #[test]
    fn parses_pipe_tables_without_separator_row() {
        let blocks = parse_markdown("Limits:\n| Name | Val |\n|:---|---:|\n| X | 1 |\nAfter");
        assert_eq!(
            blocks,
            vec![
                Block::paragraph("Limits:"),
                Block::Table(Table::new(vec![
                    vec!["Name".to_string(), "Val".to_string()],
                    vec!["X".to_string(), "1".to_string()],
                ])),
                Block::paragraph("After"),
            ]
        );
    }

    #[test]
    fn image_lines_become_drawings() {
        let blocks = parse_markdown("## Funnel\n![funnel chart](img/funnel.png)\nCaption text");
        assert_eq!(
            blocks,
            vec![
                Block::SubHeading("Funnel".to_string()),
                Block::Drawing,
                Block::paragraph("Caption text"),
            ]
        );
    }

    #[test]
    fn fenced_code_is_kept_verbatim() {
        let blocks = parse_markdown("```\n# not a heading\n| not | table |\n```");
        assert_eq!(
            blocks,
            vec![Block::paragraph("```\n# not a heading\n| not | table |\n```")]
        );
    }

    #[tokio::test]
    async fn reads_blocks_from_disk() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("playbook.md");
        tokio::fs::write(&path, "# Intro\nHello").await.unwrap();

        let source = MarkdownSource::new(&path);
        assert!(source.modified().await.is_ok());
        let blocks = source.read_blocks().await.expect("blocks");
        assert_eq!(
            blocks,
            vec![
                Block::Heading1("Intro".to_string()),
                Block::paragraph("Hello"),
            ]
        );
    }
}
