//! XLSX workbook serializer
//!
//! Writes a [`WorkbookPlan`] with `rust_xlsxwriter`:
//! - one worksheet per [`SheetPlan`], in plan order
//! - page setup (paper size, orientation, fit-to-page, margins, gridlines)
//! - column widths, row heights and the print area
//! - cell formats, created once per distinct [`CellStyle`]
//! - the shared logo, scaled into its bounding box
//!
//! A logo the library cannot decode is dropped with a warning; the sheets are
//! still written.

use guardplan_core::BuildError;
use rust_xlsxwriter::{
    Color, DocProperties, Format, FormatAlign, FormatBorder, FormatPattern, Image, Workbook,
    Worksheet, XlsxError,
};
use std::collections::HashMap;
use tracing::warn;

use crate::plan::{CellStyle, HAlign, SheetPlan, WorkbookPlan};

/// Turns a workbook plan into file bytes
pub trait WorkbookSerializer {
    fn serialize(&self, plan: &WorkbookPlan) -> Result<Vec<u8>, BuildError>;
}

/// `rust_xlsxwriter`-backed serializer
#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxSerializer;

impl XlsxSerializer {
    pub fn new() -> Self {
        Self
    }

    fn write_sheet(
        &self,
        workbook: &mut Workbook,
        sheet: &SheetPlan,
        logo: Option<&Image>,
        formats: &mut FormatCache,
    ) -> Result<(), BuildError> {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(xlsx_error)?;

        apply_page_setup(worksheet, sheet);

        for (col, width) in sheet.column_widths.iter().enumerate() {
            worksheet
                .set_column_width(col as u16, *width)
                .map_err(xlsx_error)?;
        }

        if let (Some(image), Some(placement)) = (logo, sheet.logo) {
            let scaled = image
                .clone()
                .set_scale_to_size(placement.max_width, placement.max_height, true);
            worksheet
                .insert_image(placement.row, placement.col, &scaled)
                .map_err(xlsx_error)?;
        }

        for cell in &sheet.cells {
            let format = formats.get(&cell.style);
            worksheet
                .write_string_with_format(cell.row, cell.col, &cell.value, format)
                .map_err(xlsx_error)?;
        }

        for (row, height) in &sheet.row_heights {
            worksheet.set_row_height(*row, *height).map_err(xlsx_error)?;
        }

        let area = sheet.print_area;
        worksheet
            .set_print_area(area.first_row, area.first_col, area.last_row, area.last_col)
            .map_err(xlsx_error)?;

        Ok(())
    }
}

impl WorkbookSerializer for XlsxSerializer {
    fn serialize(&self, plan: &WorkbookPlan) -> Result<Vec<u8>, BuildError> {
        if plan.sheets.is_empty() {
            return Err(BuildError::Serialize("workbook has no sheets".into()));
        }

        let mut workbook = Workbook::new();
        let properties = DocProperties::new().set_author(&plan.creator);
        workbook.set_properties(&properties);

        let logo = plan.logo.as_deref().and_then(|bytes| match Image::new_from_buffer(bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "logo could not be decoded, exporting without logo");
                None
            }
        });

        let mut formats = FormatCache::default();
        for sheet in &plan.sheets {
            self.write_sheet(&mut workbook, sheet, logo.as_ref(), &mut formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| BuildError::Serialize(format!("Failed to create Excel: {e}")))
    }
}

fn apply_page_setup(worksheet: &mut Worksheet, sheet: &SheetPlan) {
    let page = &sheet.page;
    if page.landscape {
        worksheet.set_landscape();
    } else {
        worksheet.set_portrait();
    }
    worksheet.set_paper_size(page.paper_size);
    worksheet.set_print_fit_to_pages(page.fit_to_pages.0, page.fit_to_pages.1);
    worksheet.set_print_center_horizontally(page.center_horizontally);
    worksheet.set_margins(
        page.margins.left,
        page.margins.right,
        page.margins.top,
        page.margins.bottom,
        page.margins.header,
        page.margins.footer,
    );
    worksheet.set_screen_gridlines(page.show_gridlines);
}

fn xlsx_error(e: XlsxError) -> BuildError {
    BuildError::Serialize(e.to_string())
}

/// Reusable formats, one per distinct cell style
#[derive(Default)]
struct FormatCache {
    formats: HashMap<CellStyle, Format>,
}

impl FormatCache {
    fn get(&mut self, style: &CellStyle) -> &Format {
        self.formats
            .entry(style.clone())
            .or_insert_with(|| to_format(style))
    }
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(align) = style.align {
        format = format.set_align(match align {
            HAlign::Left => FormatAlign::Left,
            HAlign::Center => FormatAlign::Center,
            HAlign::Right => FormatAlign::Right,
        });
    }
    if style.vertical_center {
        format = format.set_align(FormatAlign::VerticalCenter);
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }
    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill.rgb()));
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color.rgb()));
    }
    format
}
