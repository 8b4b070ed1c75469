//! Word (`.docx`) documents.
//!
//! A docx file is a zip package. Paragraph style ids are resolved to style
//! names through `word/styles.xml`, then `word/document.xml` is walked as an
//! event stream and flattened into [`Block`]s.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::errors::{KnowledgeError, KnowledgeResult};
use crate::models::{Block, Table};
use crate::sources::{DocumentSource, file_modified, not_found_as_unavailable};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

#[derive(Debug, Clone)]
pub struct DocxSource {
    path: PathBuf,
}

impl DocxSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for DocxSource {
    async fn modified(&self) -> KnowledgeResult<SystemTime> {
        file_modified(&self.path).await
    }

    async fn read_blocks(&self) -> KnowledgeResult<Vec<Block>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|err| not_found_as_unavailable(err, &self.path))?;
        tokio::task::spawn_blocking(move || parse_docx(&bytes))
            .await
            .map_err(|err| KnowledgeError::Io(io::Error::other(err)))?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse an in-memory docx package into blocks.
pub fn parse_docx(bytes: &[u8]) -> KnowledgeResult<Vec<Block>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => parse_styles(&xml)?,
        None => HashMap::new(),
    };
    let document = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or(KnowledgeError::MissingPart(DOCUMENT_PART))?;
    parse_document(&document, &styles)
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> KnowledgeResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

/// Map of style id to display name, e.g. `Heading1` -> `heading 1`.
fn parse_styles(xml: &str) -> KnowledgeResult<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut styles = HashMap::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"style" => current = attr(&e, b"styleId")?,
                b"name" => {
                    if let (Some(id), Some(name)) = (&current, attr(&e, b"val")?) {
                        styles.insert(id.clone(), name);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"style" => current = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(styles)
}

fn parse_document(xml: &str, styles: &HashMap<String, String>) -> KnowledgeResult<Vec<Block>> {
    let mut reader = Reader::from_str(xml);
    let mut walker = DocumentWalker::new(styles);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                walker.open(&name, &e)?;
                walker.stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name().as_ref().to_vec();
                walker.open(&name, &e)?;
                walker.close(&name);
            }
            Event::End(e) => {
                walker.stack.pop();
                walker.close(e.local_name().as_ref());
            }
            Event::Text(text) => {
                if walker.in_text_run() {
                    let text = text.unescape()?;
                    walker.push_text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(walker.blocks)
}

#[derive(Debug, Default)]
struct ParagraphState {
    style_id: Option<String>,
    text: String,
    direct_runs: usize,
    in_first_run: bool,
    lead_bold: bool,
    has_drawing: bool,
}

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
    /// Grid columns covered by the current cell (`w:gridSpan`).
    span: usize,
    /// The current cell continues a vertical merge from the row above.
    merged_down: bool,
}

impl TableState {
    fn start_cell(&mut self) {
        self.cell.clear();
        self.span = 1;
        self.merged_down = false;
    }

    /// Push the finished cell once per grid column it covers. A vertical
    /// merge continuation repeats the text of the cell above.
    fn finish_cell(&mut self) {
        let cell = std::mem::take(&mut self.cell);
        let text = if self.merged_down {
            let column = self.row.len();
            self.rows
                .last()
                .and_then(|above| above.get(column))
                .cloned()
                .unwrap_or_default()
        } else {
            cell.join("\n")
        };
        let span = self.span.max(1);
        self.row.extend(std::iter::repeat_n(text, span));
    }
}

/// Tracks where the event stream currently is.
///
/// Only top-level tables are kept; nested tables contribute nothing. Content
/// inside drawings (text boxes, alternate renderings) is skipped and only
/// marks the enclosing paragraph as carrying a figure.
struct DocumentWalker<'s> {
    styles: &'s HashMap<String, String>,
    stack: Vec<Vec<u8>>,
    blocks: Vec<Block>,
    paragraph: Option<ParagraphState>,
    table: TableState,
    table_depth: usize,
    drawing_depth: usize,
}

impl<'s> DocumentWalker<'s> {
    fn new(styles: &'s HashMap<String, String>) -> Self {
        Self {
            styles,
            stack: Vec::new(),
            blocks: Vec::new(),
            paragraph: None,
            table: TableState::default(),
            table_depth: 0,
            drawing_depth: 0,
        }
    }

    fn parent(&self) -> &[u8] {
        self.stack.last().map(Vec::as_slice).unwrap_or_default()
    }

    fn in_text_run(&self) -> bool {
        self.drawing_depth == 0
            && self.paragraph.is_some()
            && self.parent() == b"t"
            && self.is_paragraph_run(1)
    }

    /// Whether the element `depth` levels below the top of the stack is a
    /// run directly inside a paragraph or a hyperlink. Runs nested in
    /// insertions, content controls or fields do not contribute text.
    fn is_paragraph_run(&self, depth: usize) -> bool {
        let len = self.stack.len();
        if len < depth + 2 {
            return false;
        }
        self.stack[len - 1 - depth] == b"r"
            && matches!(self.stack[len - 2 - depth].as_slice(), b"p" | b"hyperlink")
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.text.push_str(text);
        }
    }

    fn open(&mut self, name: &[u8], e: &BytesStart<'_>) -> KnowledgeResult<()> {
        if is_drawing(name) {
            self.drawing_depth += 1;
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.has_drawing = true;
            }
            return Ok(());
        }
        if self.drawing_depth > 0 {
            return Ok(());
        }

        let parent = self.parent().to_vec();
        let in_paragraph_run = self.is_paragraph_run(0);
        let top_level_cell = self.table_depth == 1 && parent == b"tcPr";
        match name {
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = TableState::default();
                }
            }
            b"tc" if self.table_depth == 1 => self.table.start_cell(),
            b"gridSpan" if top_level_cell => {
                let span = attr(e, b"val")?.and_then(|v| v.parse::<usize>().ok());
                self.table.span = span.unwrap_or(1);
            }
            b"vMerge" if top_level_cell => {
                // A bare `w:vMerge` continues; `restart` opens a new merge.
                let value = attr(e, b"val")?;
                self.table.merged_down = value.as_deref() != Some("restart");
            }
            b"p" => {
                if self.paragraph.is_none() {
                    self.paragraph = Some(ParagraphState::default());
                }
            }
            b"pStyle" if parent == b"pPr" => {
                let style_id = attr(e, b"val")?;
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = style_id;
                }
            }
            b"r" if parent == b"p" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.direct_runs += 1;
                    paragraph.in_first_run = paragraph.direct_runs == 1;
                }
            }
            b"b" if parent == b"rPr" => {
                let value = attr(e, b"val")?;
                if let Some(paragraph) = self.paragraph.as_mut() {
                    if paragraph.in_first_run {
                        paragraph.lead_bold = is_on(value.as_deref());
                    }
                }
            }
            b"tab" if in_paragraph_run => self.push_text("\t"),
            b"br" | b"cr" if in_paragraph_run => self.push_text("\n"),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if is_drawing(name) {
            self.drawing_depth = self.drawing_depth.saturating_sub(1);
            return;
        }
        if self.drawing_depth > 0 {
            return;
        }

        match name {
            b"r" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.in_first_run = false;
                }
            }
            b"p" => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.finish_paragraph(paragraph);
                }
            }
            b"tc" if self.table_depth == 1 => self.table.finish_cell(),
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.table.row);
                self.table.rows.push(row);
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    let rows = std::mem::take(&mut self.table.rows);
                    self.blocks.push(Block::Table(Table::new(rows)));
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self, paragraph: ParagraphState) {
        if self.table_depth > 0 {
            if self.table_depth == 1 {
                self.table.cell.push(paragraph.text.trim().to_string());
            }
            return;
        }

        let text = paragraph.text.trim();
        if !text.is_empty() {
            let style_name = paragraph
                .style_id
                .as_deref()
                .map(|id| self.styles.get(id).map(String::as_str).unwrap_or(id));
            let block = match style_name.and_then(heading_kind) {
                Some(HeadingKind::Main) => Block::Heading1(text.to_string()),
                Some(HeadingKind::Sub) => Block::SubHeading(text.to_string()),
                None => Block::Paragraph {
                    text: text.to_string(),
                    lead_bold: paragraph.lead_bold,
                },
            };
            self.blocks.push(block);
        }
        if paragraph.has_drawing {
            self.blocks.push(Block::Drawing);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingKind {
    Main,
    Sub,
}

/// `Heading 1` (any case, any spacing) opens a main topic; every other
/// `Heading*` style opens a sub-topic.
fn heading_kind(style_name: &str) -> Option<HeadingKind> {
    let normalized: String = style_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if normalized.starts_with("heading1") {
        Some(HeadingKind::Main)
    } else if normalized.starts_with("heading") {
        Some(HeadingKind::Sub)
    } else {
        None
    }
}

fn is_drawing(name: &[u8]) -> bool {
    matches!(name, b"drawing" | b"pict" | b"object")
}

/// OOXML toggle properties are on when present without a value.
fn is_on(value: Option<&str>) -> bool {
    !matches!(value, Some("false" | "0" | "off"))
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> KnowledgeResult<Option<String>> {
    for attribute in e.attributes().filter_map(|a| a.ok()) {
        if attribute.key.local_name().as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Titre3"><w:name w:val="Heading 3"/></w:style>
  <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
</w:styles>"#;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn package(document: Option<&str>, styles: Option<&str>) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        if let Some(styles) = styles {
            writer.start_file(STYLES_PART, options).unwrap();
            writer.write_all(styles.as_bytes()).unwrap();
        }
        if let Some(document) = document {
            writer.start_file(DOCUMENT_PART, options).unwrap();
            writer.write_all(document.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn blocks(body: &str) -> Vec<Block> {
        parse_docx(&package(Some(&document(body)), Some(STYLES))).expect("parse")
    }

    fn styled(style: &str, text: &str) -> String {
        format!(r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
    }

    #[test]
    fn resolves_heading_styles_through_style_names() {
        let body = [
            styled("Heading1", "GA4 Limits"),
            styled("Heading2", "Retention"),
            styled("Titre3", "Localized"),
            styled("Normal", "Body text"),
        ]
        .concat();
        assert_eq!(
            blocks(&body),
            vec![
                Block::Heading1("GA4 Limits".to_string()),
                Block::SubHeading("Retention".to_string()),
                Block::SubHeading("Localized".to_string()),
                Block::paragraph("Body text"),
            ]
        );
    }

    #[test]
    fn unknown_style_ids_are_used_as_names() {
        let doc = document(&styled("Heading1", "No styles part"));
        let parsed = parse_docx(&package(Some(&doc), None)).expect("parse");
        assert_eq!(parsed, vec![Block::Heading1("No styles part".to_string())]);
    }

    #[test]
    fn lead_bold_comes_from_first_direct_run() {
        let body = concat!(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Bold lead</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>Explicitly off</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Plain </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>then bold</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>Mark only</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            blocks(body),
            vec![
                Block::bold("Bold lead"),
                Block::paragraph("Explicitly off"),
                Block::paragraph("Plain then bold"),
                Block::paragraph("Mark only"),
            ]
        );
    }

    #[test]
    fn joins_runs_and_unescapes_entities() {
        let body = r#"<w:p><w:r><w:t xml:space="preserve">Cookies &amp; </w:t></w:r><w:r><w:t>consent</w:t><w:tab/><w:t>mode</w:t></w:r></w:p>"#;
        assert_eq!(blocks(body), vec![Block::paragraph("Cookies & consent\tmode")]);
    }

    #[test]
    fn reads_top_level_tables_and_ignores_nested_ones() {
        let body = concat!(
            "<w:tbl>",
            "<w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>Val</w:t></w:r></w:p></w:tc></w:tr>",
            "<w:tr><w:tc><w:p><w:r><w:t>Events</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>per day</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>500</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
            "</w:tc></w:tr>",
            "</w:tbl>",
            "<w:p><w:r><w:t>After</w:t></w:r></w:p>",
        );
        assert_eq!(
            blocks(body),
            vec![
                Block::Table(Table::new(vec![
                    vec!["Name".to_string(), "Val".to_string()],
                    vec!["Events\nper day".to_string(), "500".to_string()],
                ])),
                Block::paragraph("After"),
            ]
        );
    }

    fn cell(props: &str, text: &str) -> String {
        format!("<w:tc><w:tcPr>{props}</w:tcPr><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:tc>")
    }

    #[test]
    fn merged_cells_fill_every_grid_column() {
        let body = [
            "<w:tbl><w:tr>".to_string(),
            cell(r#"<w:gridSpan w:val="2"/>"#, "Limits"),
            "</w:tr><w:tr>".to_string(),
            cell(r#"<w:vMerge w:val="restart"/>"#, "Events"),
            cell("", "500"),
            "</w:tr><w:tr>".to_string(),
            cell("<w:vMerge/>", ""),
            cell("", "per day"),
            "</w:tr></w:tbl>".to_string(),
        ]
        .concat();

        let parsed = blocks(&body);
        let Block::Table(table) = &parsed[0] else {
            panic!("expected a table, got {parsed:?}");
        };
        assert_eq!(
            table,
            &Table::new(vec![
                vec!["Limits".to_string(), "Limits".to_string()],
                vec!["Events".to_string(), "500".to_string()],
                vec!["Events".to_string(), "per day".to_string()],
            ])
        );
        assert!(crate::table::render_table(table).contains("| --- | --- |"));
    }

    #[test]
    fn text_comes_from_direct_and_hyperlinked_runs() {
        let body = concat!(
            "<w:p><w:r><w:t>See </w:t></w:r>",
            "<w:hyperlink><w:r><w:t>the limits page</w:t></w:r></w:hyperlink>",
            "<w:ins><w:r><w:t> tracked insert</w:t></w:r></w:ins>",
            "<w:sdt><w:sdtContent><w:r><w:t> control</w:t></w:r></w:sdtContent></w:sdt>",
            "<w:r><w:t>.</w:t></w:r></w:p>",
        );
        assert_eq!(blocks(body), vec![Block::paragraph("See the limits page.")]);
    }

    #[test]
    fn drawings_follow_paragraph_text_and_hide_text_boxes() {
        let body = concat!(
            "<w:p><w:r><w:t>Funnel chart</w:t></w:r>",
            "<w:r><w:drawing><wp:inline xmlns:wp=\"urn:wp\"><w:txbxContent>",
            "<w:p><w:r><w:t>box text</w:t></w:r></w:p>",
            "</w:txbxContent></wp:inline></w:drawing></w:r></w:p>",
            "<w:p><w:r><w:pict/></w:r></w:p>",
        );
        assert_eq!(
            blocks(body),
            vec![Block::paragraph("Funnel chart"), Block::Drawing, Block::Drawing]
        );
    }

    #[test]
    fn missing_document_part_is_an_error() {
        let err = parse_docx(&package(None, Some(STYLES))).err().expect("error");
        assert!(matches!(err, KnowledgeError::MissingPart(DOCUMENT_PART)));
    }

    #[test]
    fn garbage_bytes_are_a_zip_error() {
        let err = parse_docx(b"not a zip").err().expect("error");
        assert!(matches!(err, KnowledgeError::Zip(_)));
    }

    #[test]
    fn classifies_heading_names() {
        assert_eq!(heading_kind("Heading 1"), Some(HeadingKind::Main));
        assert_eq!(heading_kind("heading 1"), Some(HeadingKind::Main));
        assert_eq!(heading_kind("Heading 4"), Some(HeadingKind::Sub));
        assert_eq!(heading_kind("Title"), None);
    }

    #[tokio::test]
    async fn reads_package_from_disk() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("playbook.docx");
        let doc = document(&styled("Heading1", "Intro"));
        tokio::fs::write(&path, package(Some(&doc), Some(STYLES)))
            .await
            .unwrap();

        let source = DocxSource::new(&path);
        let parsed = source.read_blocks().await.expect("blocks");
        assert_eq!(parsed, vec![Block::Heading1("Intro".to_string())]);
        assert_eq!(source.describe(), path.display().to_string());
    }
}
