//! Text rendering of the search view

use colored::Colorize;
use scrap_core::{page_url, Page, ProjectConfig, ViewState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width reserved for a page preview
const SUBTITLE_WIDTH: usize = 60;

/// Which section an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    CreatePage,
    Search,
    Recent,
}

/// One selectable line of the rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub title: String,
    pub subtitle: String,
    pub url: String,
}

/// Renders [`ViewState`] as numbered sections
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    base_url: String,
    project: String,
    show_urls: bool,
    max_recent: Option<usize>,
}

impl ViewRenderer {
    pub fn new(config: &ProjectConfig) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            project: config.project.clone(),
            show_urls: false,
            max_recent: None,
        }
    }

    /// Print each page's URL under its title
    pub fn with_urls(mut self, show_urls: bool) -> Self {
        self.show_urls = show_urls;
        self
    }

    /// Cap the number of recent pages shown
    pub fn with_max_recent(mut self, max_recent: usize) -> Self {
        self.max_recent = Some(max_recent);
        self
    }

    /// Selectable entries in display order; numbering starts at 1
    pub fn entries(&self, view: &ViewState) -> Vec<Entry> {
        let mut entries = Vec::new();

        if let Some(query) = &view.create_page {
            entries.push(Entry {
                kind: EntryKind::CreatePage,
                title: query.clone(),
                subtitle: String::new(),
                url: page_url(&self.base_url, &self.project, query),
            });
        }

        entries.extend(view.search.iter().map(|page| self.entry(EntryKind::Search, page)));

        let recent_limit = self.max_recent.unwrap_or(usize::MAX);
        entries.extend(
            view.recent
                .iter()
                .take(recent_limit)
                .map(|page| self.entry(EntryKind::Recent, page)),
        );

        entries
    }

    /// Render the whole view
    pub fn render(&self, view: &ViewState) -> String {
        let mut out = String::new();

        if view.loading {
            out.push_str(&format!("⏳ Searching for \"{}\"...\n", view.query));
        }

        let mut current = None;
        for (index, entry) in self.entries(view).iter().enumerate() {
            if current != Some(entry.kind) {
                current = Some(entry.kind);
                out.push_str(&section_heading(entry.kind));
                out.push('\n');
            }

            let number = format!("{:>3}.", index + 1);
            out.push_str(&format!("{} {}", number.dimmed(), entry.title.bold()));
            if !entry.subtitle.is_empty() {
                out.push_str(&format!("  {}", entry.subtitle.dimmed()));
            }
            out.push('\n');

            if self.show_urls {
                out.push_str(&format!("     {}\n", entry.url.underline()));
            }
        }

        if out.is_empty() {
            out.push_str("No pages yet.\n");
        }

        out
    }

    fn entry(&self, kind: EntryKind, page: &Page) -> Entry {
        let subtitle = if kind == EntryKind::Search && page.subtitle() != page.title {
            truncate_to_width(page.subtitle(), SUBTITLE_WIDTH)
        } else {
            String::new()
        };

        Entry {
            kind,
            title: page.title.clone(),
            subtitle,
            url: page_url(&self.base_url, &self.project, &page.title),
        }
    }
}

fn section_heading(kind: EntryKind) -> String {
    let heading = match kind {
        EntryKind::CreatePage => "✏️  Create new page",
        EntryKind::Search => "🔍 Search",
        EntryKind::Recent => "🕘 Recent Titles",
    };
    heading.cyan().bold().to_string()
}

/// Cut `text` to at most `max_width` columns, marking the cut with an ellipsis
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}
