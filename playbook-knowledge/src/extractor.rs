use crate::models::{Block, DEFAULT_MAIN_TOPIC, Section};
use crate::table::render_table;

/// Bold paragraphs shorter than this are treated as informal sub-headings.
pub const LEAD_IN_MAX_CHARS: usize = 60;

const UNLABELED_SECTION: &str = "Unlabeled Section";

/// Walk blocks in document order and emit one section per heading context
/// that accumulated content.
pub fn extract_sections<I>(blocks: I) -> Vec<Section>
where
    I: IntoIterator<Item = Block>,
{
    let mut acc = SectionAccumulator::new();

    for block in blocks {
        match block {
            Block::Heading1(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    acc.open_main(text);
                }
            }
            Block::SubHeading(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    acc.open_sub(text);
                }
            }
            Block::Paragraph { text, lead_bold } => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if is_lead_in(text, lead_bold) {
                    acc.open_sub(text);
                } else {
                    acc.push(text.to_string());
                }
            }
            // Zero-row tables carry nothing worth indexing.
            Block::Table(table) if table.is_empty() => {}
            Block::Table(table) => acc.push(render_table(&table)),
            Block::Drawing => acc.push_drawing(),
        }
    }

    acc.finish()
}

fn is_lead_in(text: &str, lead_bold: bool) -> bool {
    lead_bold && text.chars().count() < LEAD_IN_MAX_CHARS
}

/// Heading context plus the content gathered since the last heading.
///
/// `flush` is the only transition with an observable effect: every heading
/// and the end of the stream flush the pending section before the context
/// changes.
#[derive(Debug)]
struct SectionAccumulator {
    main_topic: String,
    sub_topic: Option<String>,
    content: Vec<String>,
    sections: Vec<Section>,
}

impl SectionAccumulator {
    fn new() -> Self {
        Self {
            main_topic: DEFAULT_MAIN_TOPIC.to_string(),
            sub_topic: None,
            content: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn open_main(&mut self, title: &str) {
        self.flush();
        self.main_topic = title.to_string();
        self.sub_topic = None;
    }

    fn open_sub(&mut self, title: &str) {
        self.flush();
        self.sub_topic = Some(title.to_string());
    }

    fn push(&mut self, text: String) {
        self.content.push(text);
    }

    fn push_drawing(&mut self) {
        let context = self.sub_topic.as_deref().unwrap_or(UNLABELED_SECTION);
        self.content.push(format!(
            "\n> Figure in this section: {context} (see the original document)\n"
        ));
    }

    fn flush(&mut self) {
        let content = self.content.join("\n").trim().to_string();
        self.content.clear();
        if content.is_empty() {
            return;
        }

        let raw_sub = self.sub_topic.as_deref().unwrap_or("");
        let search_key = format!("{} {}", self.main_topic, raw_sub).to_lowercase();
        self.sections.push(Section {
            main_topic: self.main_topic.clone(),
            sub_topic: self
                .sub_topic
                .clone()
                .unwrap_or_else(|| self.main_topic.clone()),
            content,
            search_key,
        });
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }
}
