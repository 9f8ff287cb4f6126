//! Guard plan sheet layout
//!
//! Shapes [`ExportOptions`] into a [`WorkbookPlan`]: one sheet per day with
//!
//! ```text
//! row  1-6   logo (when available)
//! row  7     Plan de garde
//! row  8     Officier de garde : …
//! row  9     Commandant de garde : …
//! row 10     <date>
//! row 12     | Paire de soldat | 00:00 - 01:00 | 01:00 - 02:00 | …
//! row 13+    | <pair>          | <period>      | <period>      | …
//! footer     <long date>                          Tool provided by …
//! ```
//!
//! Row numbers above are 1-based as shown in Excel; the code uses 0-based
//! indices throughout.

use chrono::NaiveDate;
use guardplan_core::{
    long_french_date, period_label, Argb, BuildError, ExportOptions, GuardPair, GuardPerDay,
};
use std::collections::HashSet;
use tracing::debug;

use crate::plan::{
    CellPlan, CellRange, CellStyle, HAlign, ImagePlacement, PageSetup, SheetPlan, WorkbookPlan,
};

const TITLE_ROW: u32 = 6;
const OFFICER_ROW: u32 = 7;
const COMMANDER_ROW: u32 = 8;
const DATE_ROW: u32 = 9;
const HEADER_ROW: u32 = 11;
const FIRST_DATA_ROW: u32 = 12;
/// Blank rows between the last pair and the footer
const FOOTER_GAP: u32 = 2;

const HEADER_ROW_HEIGHT: u16 = 45;
const DATA_ROW_HEIGHT: u16 = 20;

/// Excel's limit on sheet name length
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Sheet layout configuration
#[derive(Clone, Debug)]
pub struct SheetLayout {
    /// Title in the header block
    pub title: String,
    /// Workbook author metadata
    pub creator: String,
    /// Text of the right-hand footer cell
    pub attribution: String,
    /// Header of the pair-name column
    pub pair_header: String,
    /// Printable width of the page in column units (A4 landscape)
    pub printable_width: u16,
    /// Width of the pair-name column
    pub name_column_width: u16,
    /// Logo bounding box in pixels
    pub logo_size: (u32, u32),
    pub page: PageSetup,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            title: "Plan de garde".into(),
            creator: "ArtyomInc".into(),
            attribution: "Tool provided by ArtyomInc (arduc.ch)".into(),
            pair_header: "Paire de soldat".into(),
            printable_width: 270,
            name_column_width: 22,
            logo_size: (320, 80),
            page: PageSetup::default(),
        }
    }
}

impl SheetLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the workbook author
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Set the footer attribution
    pub fn attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// Set the printable width shared by all columns
    pub fn printable_width(mut self, width: u16) -> Self {
        self.printable_width = width;
        self
    }

    /// Set the width of the pair-name column
    pub fn name_column_width(mut self, width: u16) -> Self {
        self.name_column_width = width;
        self
    }

    /// Width of every period column: the printable width left after the
    /// name column, split evenly and rounded down
    pub fn period_column_width(&self, period_count: u16) -> u16 {
        if period_count == 0 {
            return 0;
        }
        self.printable_width.saturating_sub(self.name_column_width) / period_count
    }

    /// Shape the whole workbook.
    ///
    /// `logo` is the already fetched logo, shared by every sheet; `today` is
    /// printed in each footer.
    pub fn plan(
        &self,
        options: &ExportOptions,
        logo: Option<Vec<u8>>,
        today: NaiveDate,
    ) -> Result<WorkbookPlan, BuildError> {
        options.validate()?;

        let names = sheet_names(options.guard_days.iter().map(|d| d.date.as_str()));
        let footer_date = long_french_date(today);

        let sheets = options
            .guard_days
            .iter()
            .zip(names)
            .map(|(day, name)| self.plan_sheet(options, day, name, logo.is_some(), &footer_date))
            .collect();

        Ok(WorkbookPlan {
            creator: self.creator.clone(),
            logo,
            sheets,
        })
    }

    fn plan_sheet(
        &self,
        options: &ExportOptions,
        day: &GuardPerDay,
        name: String,
        with_logo: bool,
        footer_date: &str,
    ) -> SheetPlan {
        let period_count = options.period_count;
        let mut cells = Vec::new();

        // Column widths
        let period_width = self.period_column_width(period_count);
        let mut column_widths = Vec::with_capacity(usize::from(period_count) + 1);
        column_widths.push(self.name_column_width);
        column_widths.extend(std::iter::repeat(period_width).take(usize::from(period_count)));

        // Header block
        cells.push(text_cell(TITLE_ROW, 0, &self.title, CellStyle::new().bold().font_size(14)));
        cells.push(text_cell(
            OFFICER_ROW,
            0,
            format!("Officier de garde : {}", options.officer),
            CellStyle::new(),
        ));
        cells.push(text_cell(
            COMMANDER_ROW,
            0,
            format!("Commandant de garde : {}", options.commander),
            CellStyle::new(),
        ));
        cells.push(text_cell(DATE_ROW, 0, &day.date, CellStyle::new()));

        // Table header
        cells.push(text_cell(
            HEADER_ROW,
            0,
            &self.pair_header,
            CellStyle::new().bold().align(HAlign::Left).vertical_center().border(),
        ));
        let period_header = CellStyle::new()
            .bold()
            .align(HAlign::Center)
            .vertical_center()
            .wrap()
            .border();
        for index in 0..period_count {
            cells.push(text_cell(
                HEADER_ROW,
                index + 1,
                period_label(index, options.period_duration),
                period_header.clone(),
            ));
        }
        let mut row_heights = vec![(HEADER_ROW, HEADER_ROW_HEIGHT)];

        // Pair rows
        let mut row = FIRST_DATA_ROW;
        for pair in &day.pair {
            push_pair_row(&mut cells, row, pair);
            row_heights.push((row, DATA_ROW_HEIGHT));
            row += 1;
        }

        // Footer
        let footer_row = row + FOOTER_GAP;
        cells.push(text_cell(footer_row, 0, footer_date, CellStyle::new()));
        cells.push(text_cell(
            footer_row,
            period_count,
            &self.attribution,
            CellStyle::new()
                .align(HAlign::Right)
                .font_color(Argb(0xFF73_7373)),
        ));

        debug!(
            sheet = %name,
            pairs = day.pair.len(),
            period_count,
            "planned sheet"
        );

        SheetPlan {
            name,
            column_widths,
            row_heights,
            cells,
            print_area: CellRange {
                first_row: 0,
                first_col: 0,
                last_row: footer_row,
                last_col: period_count,
            },
            page: self.page,
            logo: with_logo.then_some(ImagePlacement {
                row: 0,
                col: 0,
                max_width: self.logo_size.0,
                max_height: self.logo_size.1,
            }),
        }
    }
}

fn push_pair_row(cells: &mut Vec<CellPlan>, row: u32, pair: &GuardPair) {
    cells.push(text_cell(
        row,
        0,
        &pair.name,
        CellStyle::new().align(HAlign::Left).vertical_center().border(),
    ));

    // Only the periods present are written; trailing columns stay blank
    for (index, period) in pair.period.iter().enumerate() {
        let style = CellStyle::new()
            .align(HAlign::Center)
            .vertical_center()
            .border()
            .fill(period.fill());
        cells.push(text_cell(row, index as u16 + 1, &period.name, style));
    }
}

fn text_cell(row: u32, col: u16, value: impl Into<String>, style: CellStyle) -> CellPlan {
    CellPlan {
        row,
        col,
        value: value.into(),
        style,
    }
}

/// Legal, unique sheet names for the given day labels, in order.
///
/// Characters Excel rejects become `-`, surrounding apostrophes are dropped,
/// names are cut at 31 characters, empty names fall back to `Jour <n>` and
/// case-insensitive duplicates get a ` (2)`, ` (3)`… suffix.
pub fn sheet_names<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut names = Vec::new();

    for (index, label) in labels.into_iter().enumerate() {
        let base = sanitize_sheet_name(label, index);
        let mut candidate = base.clone();
        let mut n = 2;
        while !taken.insert(candidate.to_lowercase()) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            candidate = format!("{}{}", truncate_chars(&base, keep), suffix);
            n += 1;
        }
        names.push(candidate);
    }

    names
}

fn sanitize_sheet_name(label: &str, index: usize) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '-' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let cleaned = truncate_chars(cleaned, MAX_SHEET_NAME_LEN).trim_end_matches('\'');

    if cleaned.trim().is_empty() {
        format!("Jour {}", index + 1)
    } else {
        cleaned.to_string()
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
