//! Paginated export.
//!
//! The exporter lays out the canonical day grouping as a list of blocks
//! (header, one heading per day, one block per stop) and flows them onto
//! pages. A block never straddles a page break, and a day heading always
//! lands on the same page as its first stop. Long free-text fields are
//! shortened for layout only; the itinerary is never modified.
//!
//! Turning the result into bytes is left to a [`PdfRenderer`].

use std::borrow::Cow;
use std::io::{self, Write};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::time_label;
use crate::grouping::{DayGroup, DayKey, ScheduleOrder, group_by_day};
use crate::models::{Itinerary, Stop, StopId, Theme};
use crate::tz::format_local;

const ELLIPSIS: &str = "...";

/// Page geometry (millimetres), font sizes (points) and text budgets
/// (characters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PdfLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub title_size: f64,
    pub heading_size: f64,
    pub body_size: f64,
    pub small_size: f64,
    pub line_height: f64,
    pub block_gap: f64,
    pub name_budget: usize,
    pub address_budget: usize,
    pub notes_budget: usize,
}

impl Default for PdfLayout {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 18.0,
            title_size: 20.0,
            heading_size: 13.0,
            body_size: 10.0,
            small_size: 8.0,
            line_height: 6.0,
            block_gap: 4.0,
            name_budget: 40,
            address_budget: 60,
            notes_budget: 80,
        }
    }
}

impl PdfLayout {
    fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest y a block may reach; the footer sits below it.
    fn content_bottom(&self) -> f64 {
        self.page_height - self.margin - self.line_height
    }

    fn time_x(&self) -> f64 {
        self.margin + 8.0
    }

    fn detail_x(&self) -> f64 {
        self.margin + 42.0
    }
}

/// A drawing instruction. `y` grows down the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Text {
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        content: String,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    PageBreak,
}

impl DrawOp {
    fn shifted(mut self, dy: f64) -> Self {
        match &mut self {
            DrawOp::Text { y, .. } | DrawOp::Rect { y, .. } => *y += dy,
            DrawOp::PageBreak => {}
        }
        self
    }
}

fn text(x: f64, y: f64, size: f64, bold: bool, content: impl Into<String>) -> DrawOp {
    DrawOp::Text {
        x,
        y,
        size,
        bold,
        content: content.into(),
    }
}

/// What a laid-out block shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "block", rename_all = "camelCase")]
pub enum BlockRef {
    Header,
    Day { key: DayKey },
    Stop { day: DayKey, id: StopId },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub number: u32,
    pub ops: Vec<DrawOp>,
    /// Blocks on this page, top to bottom.
    pub contents: Vec<BlockRef>,
}

impl Page {
    fn new(number: u32) -> Self {
        Self {
            number,
            ops: Vec::new(),
            contents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl PdfDocument {
    /// Day/stop sequence in page order.
    pub fn order(&self) -> ScheduleOrder {
        let mut days: Vec<(DayKey, Vec<StopId>)> = Vec::new();

        for block in self.pages.iter().flat_map(|page| &page.contents) {
            match block {
                BlockRef::Header => {}
                BlockRef::Day { key } => days.push((*key, Vec::new())),
                BlockRef::Stop { day, id } => match days.last_mut() {
                    Some((key, ids)) if key == day => ids.push(id.clone()),
                    _ => days.push((*day, vec![id.clone()])),
                },
            }
        }

        ScheduleOrder(days)
    }

    /// Every page's operations with a [`DrawOp::PageBreak`] between pages.
    pub fn draw_ops(&self) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                ops.push(DrawOp::PageBreak);
            }
            ops.extend(page.ops.iter().cloned());
        }
        ops
    }
}

/// Shorten `text` to at most `budget` characters, ending in "..." when
/// cut. Runs of whitespace (including newlines) become single spaces.
///
/// # Examples
///
/// ```
/// use itinerary_core::pdf::truncate;
///
/// assert_eq!(truncate("Louvre", 40), "Louvre");
/// assert_eq!(truncate("Sainte-Chapelle", 8), "Saint...");
/// assert_eq!(truncate("line one\nline two", 40), "line one line two");
/// ```
pub fn truncate(text: &str, budget: usize) -> Cow<'_, str> {
    let single_line = text.trim() == text
        && !text.contains("  ")
        && !text.contains(|c: char| c.is_whitespace() && c != ' ');

    let text: Cow<'_, str> = if single_line {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.split_whitespace().collect::<Vec<_>>().join(" "))
    };

    if text.chars().count() <= budget {
        return text;
    }

    // Too short for an ellipsis: hard cut.
    if budget <= ELLIPSIS.len() {
        return Cow::Owned(text.chars().take(budget).collect());
    }

    let keep = budget - ELLIPSIS.len();
    let mut cut: String = text.chars().take(keep).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(ELLIPSIS);
    Cow::Owned(cut)
}

struct Block {
    content: BlockRef,
    height: f64,
    /// Move to the next page together with the following block.
    keep_with_next: bool,
    /// Positioned relative to the block's top edge.
    ops: Vec<DrawOp>,
}

/// Lays out an itinerary for export.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    layout: PdfLayout,
}

impl PdfExporter {
    pub fn new(layout: PdfLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &PdfLayout {
        &self.layout
    }

    /// Lay out `itinerary`. Completion times are shown in `tz`.
    pub fn export(&self, itinerary: &Itinerary, tz: Tz) -> PdfDocument {
        let mut blocks = vec![self.header_block(itinerary)];
        for group in group_by_day(&itinerary.stops) {
            blocks.push(self.day_block(&group, itinerary.theme));
            for stop in &group.stops {
                blocks.push(self.stop_block(group.key, stop, tz));
            }
        }

        let pages = self.paginate(blocks);
        debug!(
            itinerary = %itinerary.id,
            pages = pages.len(),
            stops = itinerary.stops.len(),
            "laid out export"
        );

        PdfDocument {
            title: itinerary.name.clone(),
            pages,
        }
    }

    fn paginate(&self, blocks: Vec<Block>) -> Vec<Page> {
        let top = self.layout.margin;
        let bottom = self.layout.content_bottom();
        let heights: Vec<f64> = blocks.iter().map(|b| b.height).collect();

        let mut pages = Vec::new();
        let mut page = Page::new(1);
        let mut y = top;

        for (i, block) in blocks.into_iter().enumerate() {
            let mut needed = block.height;
            if block.keep_with_next {
                needed += heights.get(i + 1).copied().unwrap_or(0.0);
            }

            // An oversized block still gets a page of its own.
            if y + needed > bottom && !page.contents.is_empty() {
                let next = Page::new(page.number + 1);
                pages.push(std::mem::replace(&mut page, next));
                y = top;
            }

            page.ops.extend(block.ops.into_iter().map(|op| op.shifted(y)));
            page.contents.push(block.content);
            y += block.height;
        }
        pages.push(page);

        let total = pages.len();
        for page in &mut pages {
            page.ops.push(text(
                self.layout.margin,
                self.layout.page_height - self.layout.margin,
                self.layout.small_size,
                false,
                format!("Page {} of {}", page.number, total),
            ));
        }

        pages
    }

    fn header_block(&self, itinerary: &Itinerary) -> Block {
        let l = &self.layout;
        let mut ops = vec![text(
            l.margin,
            2.0 * l.line_height,
            l.title_size,
            true,
            truncate(&itinerary.name, l.name_budget),
        )];

        let mut lines = Vec::new();
        if let Some(range) = itinerary.date_range_label() {
            lines.push(range);
        }
        lines.push(format!("Status: {}", itinerary.status));
        if !itinerary.notes.trim().is_empty() {
            lines.push(truncate(&itinerary.notes, l.notes_budget).into_owned());
        }

        let mut row = 2.0;
        for line in lines {
            row += 1.0;
            ops.push(text(l.margin, row * l.line_height, l.body_size, false, line));
        }

        let rule_y = row * l.line_height + 1.0;
        ops.push(DrawOp::Rect {
            x: l.margin,
            y: rule_y,
            width: l.content_width(),
            height: 0.5,
            fill: itinerary.theme.accent().to_string(),
        });

        Block {
            content: BlockRef::Header,
            height: rule_y + 0.5 + l.block_gap,
            keep_with_next: false,
            ops,
        }
    }

    fn day_block(&self, group: &DayGroup<'_>, theme: Theme) -> Block {
        let l = &self.layout;
        let ops = vec![
            DrawOp::Rect {
                x: l.margin,
                y: 0.0,
                width: l.content_width(),
                height: l.line_height + 1.0,
                fill: theme.accent().to_string(),
            },
            text(
                l.margin + 2.0,
                l.line_height,
                l.heading_size,
                true,
                group.title(),
            ),
        ];

        Block {
            content: BlockRef::Day { key: group.key },
            height: l.line_height + l.block_gap,
            keep_with_next: true,
            ops,
        }
    }

    fn stop_block(&self, day: DayKey, stop: &Stop, tz: Tz) -> Block {
        let l = &self.layout;
        let mark = if stop.completed { "[x]" } else { "[ ]" };
        let mut ops = vec![
            text(l.margin, l.line_height, l.body_size, false, mark),
            text(l.time_x(), l.line_height, l.body_size, false, time_label(stop)),
            text(
                l.detail_x(),
                l.line_height,
                l.body_size,
                true,
                truncate(&stop.name, l.name_budget),
            ),
        ];

        let details = [
            (!stop.address.trim().is_empty())
                .then(|| truncate(&stop.address, l.address_budget).into_owned()),
            (!stop.notes.trim().is_empty())
                .then(|| truncate(&stop.notes, l.notes_budget).into_owned()),
            stop.completed_at.map(|ts| format!("Completed {}", format_local(ts, tz))),
        ];

        let mut rows = 1.0;
        for line in details.into_iter().flatten() {
            rows += 1.0;
            ops.push(text(l.detail_x(), rows * l.line_height, l.small_size, false, line));
        }

        Block {
            content: BlockRef::Stop {
                day,
                id: stop.id.clone(),
            },
            height: rows * l.line_height + l.block_gap,
            keep_with_next: false,
            ops,
        }
    }
}

/// Turns a laid-out document into a file.
pub trait PdfRenderer {
    fn render(&self, document: &PdfDocument) -> io::Result<Vec<u8>>;
}

/// Separator the plain-text renderer writes between pages.
pub const PAGE_SEPARATOR: &str = "--- page break ---";

/// Millimetres per character column in plain-text output.
const MM_PER_COLUMN: f64 = 2.0;

/// Renders text operations as lines of plain text. Texts sharing a
/// baseline go on one line, indented by their x position.
#[derive(Debug, Clone)]
pub struct PlainTextRenderer {
    margin: f64,
}

impl PlainTextRenderer {
    pub fn new(layout: &PdfLayout) -> Self {
        Self {
            margin: layout.margin,
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new(&PdfLayout::default())
    }
}

fn pad_to(line: &mut String, column: usize) {
    let width = line.chars().count();
    if width < column {
        line.extend(std::iter::repeat_n(' ', column - width));
    } else if width > 0 {
        line.push(' ');
    }
}

impl PdfRenderer for PlainTextRenderer {
    fn render(&self, document: &PdfDocument) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut line: Option<(f64, String)> = None;

        for op in document.draw_ops() {
            match op {
                DrawOp::Text { x, y, content, .. } => {
                    let same_line = matches!(&line, Some((line_y, _)) if *line_y == y);
                    if !same_line {
                        if let Some((_, finished)) = line.take() {
                            writeln!(out, "{finished}")?;
                        }
                        line = Some((y, String::new()));
                    }
                    if let Some((_, current)) = line.as_mut() {
                        let column = ((x - self.margin) / MM_PER_COLUMN).round().max(0.0) as usize;
                        pad_to(current, column);
                        current.push_str(&content);
                    }
                }
                DrawOp::Rect { .. } => {}
                DrawOp::PageBreak => {
                    if let Some((_, finished)) = line.take() {
                        writeln!(out, "{finished}")?;
                    }
                    writeln!(out, "{PAGE_SEPARATOR}")?;
                }
            }
        }

        if let Some((_, finished)) = line.take() {
            writeln!(out, "{finished}")?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeBucket;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    fn sample() -> Itinerary {
        Itinerary::new("trip-1", "Kyoto")
            .with_dates(june(1), june(2))
            .with_stops(vec![
                Stop::new("s1", "Gion stroll").on(june(1)).in_bucket(TimeBucket::Evening),
                Stop::new("s2", "Fushimi Inari").on(june(1)).at("07:00"),
                Stop::new("s3", "Nishiki market").on(june(2)).at("11:00"),
                Stop::new("s4", "Tea ceremony"),
            ])
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let name = "Café ".repeat(10);
        let cut = truncate(&name, 12);
        assert_eq!(cut.chars().count(), 12);
        assert_eq!(cut, "Café Café...");
    }

    #[test]
    fn truncate_borrows_when_nothing_changes() {
        assert!(matches!(truncate("Louvre", 40), Cow::Borrowed("Louvre")));
        assert_eq!(truncate("  spaced   out  ", 40), "spaced out");
    }

    #[test]
    fn truncate_never_exceeds_a_tiny_budget() {
        assert_eq!(truncate("abcdefgh", 2), "ab");
        assert_eq!(truncate("abcdefgh", 3), "abc");
        assert_eq!(truncate("abcdefgh", 0), "");
        assert_eq!(truncate("abcdefgh", 4), "a...");
    }

    #[test]
    fn truncate_exact_budget_is_untouched() {
        let forty = "x".repeat(40);
        assert_eq!(truncate(&forty, 40), forty);
    }

    #[test]
    fn export_truncates_without_touching_the_stop() {
        let note = "n".repeat(100);
        let mut stop = Stop::new("s1", "Long note").on(june(1));
        stop.notes = note.clone();
        let itinerary = Itinerary::new("trip", "Trip")
            .with_dates(june(1), june(1))
            .with_stops(vec![stop]);
        let before = itinerary.clone();

        let document = PdfExporter::default().export(&itinerary, Tz::UTC);

        let rendered = texts(&document.pages[0])
            .into_iter()
            .find(|t| t.starts_with('n'))
            .unwrap();
        assert_eq!(rendered.chars().count(), 80);
        assert!(rendered.ends_with("..."));
        assert_eq!(itinerary, before);
        assert_eq!(itinerary.stops[0].notes, note);
    }

    #[test]
    fn export_follows_canonical_order() {
        let itinerary = sample();
        let document = PdfExporter::default().export(&itinerary, Tz::UTC);
        assert_eq!(
            document.order(),
            ScheduleOrder::of_groups(&group_by_day(&itinerary.stops))
        );

        let page = texts(&document.pages[0]);
        let inari = page.iter().position(|t| *t == "Fushimi Inari").unwrap();
        let gion = page.iter().position(|t| *t == "Gion stroll").unwrap();
        assert!(inari < gion);
    }

    #[test]
    fn blocks_never_split_and_headings_keep_with_their_first_stop() {
        let stops: Vec<Stop> = (0..60)
            .map(|i| {
                let mut stop = Stop::new(format!("s{i:02}"), format!("Stop {i:02}"))
                    .on(june(1 + (i % 3) as u32))
                    .at(format!("{:02}:00", 8 + i / 6));
                stop.address = "1 Main Street".to_string();
                stop
            })
            .collect();
        let itinerary = Itinerary::new("trip", "Long trip")
            .with_dates(june(1), june(3))
            .with_stops(stops);

        let layout = PdfLayout::default();
        let document = PdfExporter::new(layout.clone()).export(&itinerary, Tz::UTC);
        assert!(document.pages.len() > 1);

        for page in &document.pages {
            assert!(!matches!(page.contents.last(), Some(BlockRef::Day { .. })));
            for op in &page.ops {
                if let DrawOp::Text { y, content, .. } = op {
                    if !content.starts_with("Page ") {
                        assert!(*y <= layout.content_bottom(), "{content} at {y}");
                    }
                }
            }
        }

        let placed: usize = document.order().0.iter().map(|(_, ids)| ids.len()).sum();
        assert_eq!(placed, 60);
        assert_eq!(
            document.order(),
            ScheduleOrder::of_groups(&group_by_day(&itinerary.stops))
        );
    }

    #[test]
    fn every_page_has_a_footer() {
        let itinerary = sample();
        let document = PdfExporter::default().export(&itinerary, Tz::UTC);
        let total = document.pages.len();
        for page in &document.pages {
            let footer = format!("Page {} of {}", page.number, total);
            assert!(texts(page).contains(&footer.as_str()));
        }
    }

    #[test]
    fn completion_time_is_local() {
        let mut itinerary = sample();
        itinerary.stops[1].completed = true;
        itinerary.stops[1].completed_at =
            Some(Utc.with_ymd_and_hms(2024, 5, 31, 22, 30, 0).single().unwrap());

        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let document = PdfExporter::default().export(&itinerary, tz);
        let page = texts(&document.pages[0]);
        assert!(page.contains(&"Completed 2024-06-01 07:30"));
        assert!(page.contains(&"[x]"));
    }

    #[test]
    fn layout_loads_partial_json() {
        let layout: PdfLayout = serde_json::from_str(r#"{"notesBudget": 20}"#).unwrap();
        assert_eq!(layout.notes_budget, 20);
        assert_eq!(layout.name_budget, 40);
        assert_eq!(layout.page_height, 297.0);
    }

    #[test]
    fn draw_ops_separate_pages() {
        let document = PdfDocument {
            title: "t".to_string(),
            pages: vec![Page::new(1), Page::new(2), Page::new(3)],
        };
        assert_eq!(document.draw_ops(), [DrawOp::PageBreak, DrawOp::PageBreak]);
    }

    #[test]
    fn plain_text_puts_a_stop_on_one_line() {
        let itinerary = Itinerary::new("trip", "Kyoto")
            .with_stops(vec![Stop::new("s1", "Fushimi Inari").on(june(1)).at("07:00")]);
        let document = PdfExporter::default().export(&itinerary, Tz::UTC);
        let bytes = PlainTextRenderer::default().render(&document).unwrap();
        let output = String::from_utf8(bytes).unwrap();

        assert_eq!(
            output,
            "Kyoto\nStatus: Planned\n Day 1 - Sat, Jun 1\n[ ] 07:00            Fushimi Inari\nPage 1 of 1\n"
        );
    }
}
