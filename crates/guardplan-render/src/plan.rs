//! Serializer-independent description of a workbook
//!
//! The layout code fills these types; a [`crate::WorkbookSerializer`] turns
//! them into bytes. Nothing here knows about a particular spreadsheet library.

use guardplan_core::Argb;

/// Horizontal alignment of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Visual style of a single cell
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub bold: bool,
    /// Font size in points (library default when `None`)
    pub font_size: Option<u8>,
    pub align: Option<HAlign>,
    pub vertical_center: bool,
    pub wrap: bool,
    /// Thin border on all four sides
    pub border: bool,
    /// Solid background fill
    pub fill: Option<Argb>,
    pub font_color: Option<Argb>,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn font_size(mut self, size: u8) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn vertical_center(mut self) -> Self {
        self.vertical_center = true;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn border(mut self) -> Self {
        self.border = true;
        self
    }

    pub fn fill(mut self, fill: Option<Argb>) -> Self {
        self.fill = fill;
        self
    }

    pub fn font_color(mut self, color: Argb) -> Self {
        self.font_color = Some(color);
        self
    }
}

/// A written cell (0-based coordinates)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellPlan {
    pub row: u32,
    pub col: u16,
    pub value: String,
    pub style: CellStyle,
}

/// Rectangular block of cells, inclusive on both ends (0-based)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl CellRange {
    /// A1-style reference, e.g. `A1:Y15`
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            col_to_letter(self.first_col),
            self.first_row + 1,
            col_to_letter(self.last_col),
            self.last_row + 1
        )
    }
}

/// Convert column number to Excel letter (0 -> A, 25 -> Z, 26 -> AA)
pub fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Page margins in inches
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub header: f64,
    pub footer: f64,
}

/// Print and view settings of a sheet
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    pub landscape: bool,
    /// Excel paper size code (9 = A4)
    pub paper_size: u8,
    /// Fit to this many pages wide / tall
    pub fit_to_pages: (u16, u16),
    pub center_horizontally: bool,
    pub margins: Margins,
    pub show_gridlines: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            landscape: true,
            paper_size: 9,
            fit_to_pages: (1, 1),
            center_horizontally: true,
            margins: Margins {
                left: 0.5,
                right: 0.5,
                top: 0.5,
                bottom: 0.5,
                header: 0.3,
                footer: 0.3,
            },
            show_gridlines: false,
        }
    }
}

/// Where the workbook logo goes on a sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImagePlacement {
    pub row: u32,
    pub col: u16,
    /// Bounding box in pixels; the image keeps its aspect ratio inside it
    pub max_width: u32,
    pub max_height: u32,
}

/// One worksheet
#[derive(Clone, Debug, PartialEq)]
pub struct SheetPlan {
    pub name: String,
    /// Width of each column, starting at column A
    pub column_widths: Vec<u16>,
    /// Explicit row heights in points
    pub row_heights: Vec<(u32, u16)>,
    pub cells: Vec<CellPlan>,
    pub print_area: CellRange,
    pub page: PageSetup,
    pub logo: Option<ImagePlacement>,
}

impl SheetPlan {
    /// Cell at the given 0-based position, if anything is written there
    pub fn cell(&self, row: u32, col: u16) -> Option<&CellPlan> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Value of a cell, if written
    pub fn value(&self, row: u32, col: u16) -> Option<&str> {
        self.cell(row, col).map(|c| c.value.as_str())
    }

    /// Cells of one row, ordered by column
    pub fn row(&self, row: u32) -> Vec<&CellPlan> {
        let mut cells: Vec<&CellPlan> = self.cells.iter().filter(|c| c.row == row).collect();
        cells.sort_by_key(|c| c.col);
        cells
    }
}

/// A full workbook: metadata, the shared logo and one sheet per day
#[derive(Clone, Debug, PartialEq)]
pub struct WorkbookPlan {
    pub creator: String,
    /// Raw logo bytes, shared by every sheet with a placement
    pub logo: Option<Vec<u8>>,
    pub sheets: Vec<SheetPlan>,
}
