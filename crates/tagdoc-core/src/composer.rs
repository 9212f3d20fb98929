//! Template composer
//!
//! Assembles a cover page, optional summary, table of contents, ordered
//! chapters and a footer into one [`DocumentModel`], keeping a parallel
//! list of [`TocEntry`] items.
//!
//! The table of contents lists only the entries registered *before*
//! [`Composer::generate_table_of_contents`] is called. The composite flows
//! call it right after the introductory chapter, so later chapters are not
//! part of the rendered contents.
//!
//! # Example
//!
//! ```
//! use tagdoc_core::composer::{Composer, TemplateConfig};
//!
//! let mut composer = Composer::new(TemplateConfig::default());
//! composer.add_chapter("Summary", 1, "s");
//! assert_eq!(composer.generate_table_of_contents(), 1);
//! composer.add_chapter("Details", 2, "d");
//!
//! let composition = composer.finish();
//! assert_eq!(composition.toc.len(), 2);
//! ```

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tagdoc_model::{Alignment, Block, DocumentModel, List, Paragraph, Table, TocEntry};

use crate::error::{ConversionError, Result};

/// Timestamp format used when the configured one is not a valid strftime string
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Composition options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TemplateConfig {
    /// Register chapters and render a table of contents
    pub generate_toc: bool,
    /// Emit a cover page
    pub generate_cover_page: bool,
    /// Emit a footer paragraph
    pub generate_footer: bool,
    /// Heading of the table of contents
    pub toc_title: String,
    /// strftime format for cover and footer timestamps
    pub date_format: String,
    /// Company name shown in the footer
    pub company: String,
    /// Department name shown in the footer
    pub department: String,
    /// Default author for cover pages
    pub author: String,
    /// Chapter title used by [`Composer::add_summary`]
    pub summary_title: String,
    /// Chapter title for report conclusions
    pub conclusion_title: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            generate_toc: true,
            generate_cover_page: true,
            generate_footer: true,
            toc_title: "Table of Contents".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            company: String::new(),
            department: String::new(),
            author: String::new(),
            summary_title: "Executive Summary".to_string(),
            conclusion_title: "Conclusion".to_string(),
        }
    }
}

/// Result of a finished composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// The composed document
    pub model: DocumentModel,
    /// Every TOC entry registered during composition
    pub toc: Vec<TocEntry>,
}

/// One chapter of a composed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Heading text
    pub title: String,
    /// Heading level, 1 when omitted
    #[serde(default = "default_chapter_level")]
    pub level: u8,
    /// Body text; a blank body adds only the heading
    #[serde(default)]
    pub content: String,
}

fn default_chapter_level() -> u8 {
    1
}

impl Chapter {
    pub fn new(title: impl Into<String>, level: u8, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level,
            content: content.into(),
        }
    }
}

/// Input for [`Composer::generate_report`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    /// Cover title
    pub title: String,
    /// Cover line under the title
    pub subtitle: Option<String>,
    /// Overrides the configured author
    pub author: Option<String>,
    /// Body of the summary chapter placed before the TOC
    pub summary: Option<String>,
    /// Main chapters, in order
    pub chapters: Vec<Chapter>,
    /// Body of the closing chapter
    pub conclusion: Option<String>,
}

/// Input for [`Composer::generate_technical_document`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalDocument {
    /// Cover title
    pub title: String,
    /// Shown on the cover as "Version <version>"
    pub version: Option<String>,
    /// Overrides the configured author
    pub author: Option<String>,
    /// Body of the Introduction chapter placed before the TOC
    pub introduction: Option<String>,
    /// Main sections, each at its own level
    pub sections: Vec<Chapter>,
    /// Appendices, added at level 2 under "Appendices"
    pub appendices: Vec<Chapter>,
}

/// Input for [`Composer::generate_meeting_minutes`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingMinutes {
    /// Cover title
    pub title: String,
    /// Meeting date, free text
    pub date: Option<String>,
    /// Meeting place, free text
    pub location: Option<String>,
    /// Bulleted under "Attendees"
    pub attendees: Vec<String>,
    /// Numbered under "Agenda"
    pub agenda: Vec<String>,
    /// Discussion topics, one chapter each
    pub discussion: Vec<Chapter>,
    /// Bulleted under "Decisions"
    pub decisions: Vec<String>,
    /// Rows of the action item table
    pub action_items: Vec<ActionItem>,
}

/// One row of the action item table in meeting minutes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionItem {
    /// What has to be done
    pub task: String,
    /// Who does it
    pub owner: String,
    /// When it is due, free text
    pub due: String,
}

/// Builds one composed document
///
/// A composer is used for a single composition and consumed by
/// [`Composer::finish`].
#[derive(Debug, Clone)]
pub struct Composer {
    config: TemplateConfig,
    model: DocumentModel,
    toc: Vec<TocEntry>,
    timestamp: NaiveDateTime,
}

impl Composer {
    /// Create a composer stamped with the current local time
    pub fn new(config: TemplateConfig) -> Self {
        Self {
            config,
            model: DocumentModel::new(),
            toc: Vec::new(),
            timestamp: Local::now().naive_local(),
        }
    }

    /// Replace the timestamp used on the cover page and footer
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// The document composed so far
    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    /// TOC entries registered so far
    pub fn toc_entries(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Timestamp formatted with the configured `date-format`
    ///
    /// Falls back to [`DEFAULT_DATE_FORMAT`] when the configured format has
    /// invalid specifiers or needs data a local timestamp lacks (`%Z`, `%z`).
    pub fn formatted_timestamp(&self) -> String {
        let format = self.config.date_format.as_str();
        let valid = !format.is_empty()
            && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
        if valid {
            let mut formatted = String::new();
            if write!(formatted, "{}", self.timestamp.format(format)).is_ok() {
                return formatted;
            }
        }
        log::warn!(
            "Unusable date format {:?}, using {:?}",
            format,
            DEFAULT_DATE_FORMAT
        );
        self.timestamp.format(DEFAULT_DATE_FORMAT).to_string()
    }

    /// Add a cover page: title, optional subtitle and author, date, page break
    ///
    /// The document title and author are recorded even when cover pages are
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingTitle`] if `title` is blank.
    pub fn add_cover_page(
        &mut self,
        title: &str,
        subtitle: Option<&str>,
        author: Option<&str>,
    ) -> Result<()> {
        let author = self.resolve_author(author);
        let mut lines = Vec::new();
        lines.extend(subtitle.map(str::to_string));
        lines.extend(author.clone());
        self.cover("document", title, &lines, author)
    }

    fn cover(
        &mut self,
        kind: &'static str,
        title: &str,
        lines: &[String],
        author: Option<String>,
    ) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ConversionError::MissingTitle(kind));
        }

        self.model.title = Some(title.to_string());
        self.model.author = author;

        if !self.config.generate_cover_page {
            return Ok(());
        }

        self.push_centered(Paragraph::bold(title));
        for line in lines.iter().filter(|l| !l.trim().is_empty()) {
            self.push_centered(Paragraph::new(line.trim()));
        }
        let date = self.formatted_timestamp();
        self.push_centered(Paragraph::new(date));
        self.model.push(Block::PageBreak);
        Ok(())
    }

    fn push_centered(&mut self, paragraph: Paragraph) {
        let paragraph = paragraph.with_attribute("align", Alignment::Center.as_str());
        self.model.push(Block::Paragraph(paragraph));
    }

    /// Add the summary chapter under the configured summary title
    pub fn add_summary(&mut self, text: &str) {
        let title = self.config.summary_title.clone();
        self.add_chapter(&title, 1, text);
    }

    /// Add a chapter heading, its content paragraph, and a TOC entry
    pub fn add_chapter(&mut self, title: &str, level: u8, content: &str) {
        let heading = tagdoc_model::Heading::new(level, title.trim());
        let level = heading.level;
        self.model.push(Block::Heading(heading));

        let content = content.trim();
        if !content.is_empty() {
            self.model.push(Block::paragraph(content));
        }

        if self.config.generate_toc {
            let ordinal = self.toc.len() + 1;
            self.toc.push(TocEntry::new(title.trim(), level, ordinal));
        }
    }

    /// Add a list of plain-text items
    pub fn add_list<S: AsRef<str>>(&mut self, items: &[S], ordered: bool) {
        let items: Vec<String> = items
            .iter()
            .map(|i| i.as_ref().trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        if items.is_empty() {
            return;
        }
        self.model.push(Block::List(List { ordered, items }));
    }

    /// Add a table, optionally captioned
    pub fn add_table(&mut self, rows: Vec<Vec<String>>, caption: Option<&str>) {
        let mut table = Table::new(rows);
        table.caption = caption.map(str::to_string);
        self.model.push(Block::Table(table));
    }

    /// Add any block as is
    pub fn add_block(&mut self, block: Block) {
        self.model.push(block);
    }

    /// Splice the blocks of a converted document into the composition
    pub fn append_model(&mut self, model: DocumentModel) {
        self.model.extend(model.blocks);
    }

    /// Render the TOC from the entries registered so far
    ///
    /// Returns the number of entries rendered. Nothing is emitted when TOC
    /// generation is disabled or no entry has been registered yet.
    pub fn generate_table_of_contents(&mut self) -> usize {
        if !self.config.generate_toc || self.toc.is_empty() {
            return 0;
        }

        self.model
            .push(Block::heading(1, self.config.toc_title.clone()));
        let lines: Vec<String> = self.toc.iter().map(TocEntry::line).collect();
        let count = lines.len();
        for line in lines {
            self.model.push(Block::paragraph(line));
        }
        log::debug!("Rendered table of contents with {} entries", count);
        count
    }

    /// Add the footer paragraph: company, department and generation time
    pub fn add_footer(&mut self) {
        if !self.config.generate_footer {
            return;
        }

        let generated = format!("Generated: {}", self.formatted_timestamp());
        let parts: Vec<&str> = [
            self.config.company.as_str(),
            self.config.department.as_str(),
            generated.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
        let text = parts.join(" | ");
        self.push_centered(Paragraph::new(text));
    }

    /// Finish the composition
    pub fn finish(self) -> Composition {
        Composition {
            model: self.model,
            toc: self.toc,
        }
    }

    /// Compose a report
    ///
    /// Cover, summary chapter, TOC, chapters, conclusion, footer.
    pub fn generate_report(&mut self, report: &Report) -> Result<()> {
        let author = self.resolve_author(report.author.as_deref());
        let lines: Vec<String> = report.subtitle.iter().chain(author.iter()).cloned().collect();
        self.cover("report", &report.title, &lines, author)?;

        if let Some(summary) = &report.summary {
            self.add_summary(summary);
        }
        self.generate_table_of_contents();

        for chapter in &report.chapters {
            self.add_chapter(&chapter.title, chapter.level, &chapter.content);
        }
        if let Some(conclusion) = &report.conclusion {
            let title = self.config.conclusion_title.clone();
            self.add_chapter(&title, 1, conclusion);
        }

        self.add_footer();
        Ok(())
    }

    /// Compose a technical document
    ///
    /// Cover with version, introduction, TOC, sections, appendices, footer.
    pub fn generate_technical_document(&mut self, doc: &TechnicalDocument) -> Result<()> {
        let author = self.resolve_author(doc.author.as_deref());
        let version = doc.version.as_ref().map(|v| format!("Version {}", v));
        let lines: Vec<String> = version.into_iter().chain(author.iter().cloned()).collect();
        self.cover("technical document", &doc.title, &lines, author)?;

        if let Some(intro) = &doc.introduction {
            self.add_chapter("Introduction", 1, intro);
        }
        self.generate_table_of_contents();

        for section in &doc.sections {
            self.add_chapter(&section.title, section.level, &section.content);
        }

        if !doc.appendices.is_empty() {
            self.add_chapter("Appendices", 1, "");
            for appendix in &doc.appendices {
                self.add_chapter(&appendix.title, 2, &appendix.content);
            }
        }

        self.add_footer();
        Ok(())
    }

    /// Compose meeting minutes
    ///
    /// Cover, meeting information, TOC, attendees, agenda, discussion,
    /// decisions, action items, footer.
    pub fn generate_meeting_minutes(&mut self, minutes: &MeetingMinutes) -> Result<()> {
        let lines: Vec<String> = minutes
            .date
            .iter()
            .chain(minutes.location.iter())
            .cloned()
            .collect();
        let author = self.resolve_author(None);
        self.cover("meeting minutes", &minutes.title, &lines, author)?;

        let mut info = Vec::new();
        if let Some(date) = &minutes.date {
            info.push(format!("Date: {}", date));
        }
        if let Some(location) = &minutes.location {
            info.push(format!("Location: {}", location));
        }
        self.add_chapter("Meeting Information", 1, &info.join(" | "));
        self.generate_table_of_contents();

        if !minutes.attendees.is_empty() {
            self.add_chapter("Attendees", 1, "");
            self.add_list(&minutes.attendees, false);
        }
        if !minutes.agenda.is_empty() {
            self.add_chapter("Agenda", 1, "");
            self.add_list(&minutes.agenda, true);
        }
        for topic in &minutes.discussion {
            self.add_chapter(&topic.title, topic.level, &topic.content);
        }
        if !minutes.decisions.is_empty() {
            self.add_chapter("Decisions", 1, "");
            self.add_list(&minutes.decisions, false);
        }
        if !minutes.action_items.is_empty() {
            self.add_chapter("Action Items", 1, "");
            let mut rows = vec![vec![
                "Task".to_string(),
                "Owner".to_string(),
                "Due".to_string(),
            ]];
            rows.extend(
                minutes
                    .action_items
                    .iter()
                    .map(|item| vec![item.task.clone(), item.owner.clone(), item.due.clone()]),
            );
            self.add_table(rows, None);
        }

        self.add_footer();
        Ok(())
    }

    fn resolve_author(&self, author: Option<&str>) -> Option<String> {
        author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or_else(|| Some(self.config.author.clone()).filter(|a| !a.is_empty()))
    }
}
