//! # guardplan-render
//!
//! Rendering backends for guardplan exports.
//!
//! This crate provides:
//! - Sheet layout: `ExportOptions` → serializer-free `WorkbookPlan`
//! - XLSX serialization of a plan (via `rust_xlsxwriter`)
//! - The export pipeline with logo fetch, default file name and sink delivery
//! - Filesystem and in-memory sinks, filesystem logo source
//!
//! ## Example
//!
//! ```rust,no_run
//! use guardplan_core::{ExportOptions, GuardPair, GuardPerDay, GuardPeriod};
//! use guardplan_render::{DirectorySink, FsLogoSource, ScheduleExporter};
//!
//! let day = GuardPerDay::new("Lundi 12.05").pair(
//!     GuardPair::new("Muller / Rossi").period(GuardPeriod::new("Poste").class("bg-sky-200")),
//! );
//! let options = ExportOptions::new(vec![day], 60, 24).logo_path("/logo.png");
//!
//! let exporter = ScheduleExporter::new().logo_source(FsLogoSource::new().base_dir("public"));
//! let report = exporter.export(&options, &mut DirectorySink::new("."))?;
//! println!("wrote {}", report.filename);
//! # Ok::<(), guardplan_core::ExportError>(())
//! ```

pub mod export;
pub mod io;
pub mod layout;
pub mod plan;
pub mod xlsx;

pub use export::{default_filename, ExportReport, ScheduleExporter};
pub use io::{DirectorySink, FsLogoSource, MemorySink, SavedFile};
pub use layout::{sheet_names, SheetLayout};
pub use plan::{
    col_to_letter, CellPlan, CellRange, CellStyle, HAlign, ImagePlacement, Margins, PageSetup,
    SheetPlan, WorkbookPlan,
};
pub use xlsx::{WorkbookSerializer, XlsxSerializer};
