//! Export pipeline: validate, fetch the logo, plan, serialize, save.
//!
//! Every failure except a missing logo ends the export and reaches the caller
//! as one [`ExportError`]; the underlying cause is logged first.

use chrono::{Local, NaiveDate};
use guardplan_core::{
    BuildError, ExportError, ExportOptions, FileSink, LogoSource, NoLogo, XLSX_MIME_TYPE,
};
use tracing::{debug, error, info, warn};

use crate::layout::SheetLayout;
use crate::xlsx::{WorkbookSerializer, XlsxSerializer};

/// Outcome of a successful export
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    /// File name handed to the sink
    pub filename: String,
    pub sheets: usize,
    pub bytes: usize,
    /// Whether the logo source returned an image
    pub logo_fetched: bool,
}

/// Default file name for an export made on `date`
pub fn default_filename(date: NaiveDate) -> String {
    format!("plan-de-garde-{}.xlsx", date.format("%Y-%m-%d"))
}

/// Guard plan exporter
#[derive(Clone, Debug, Default)]
pub struct ScheduleExporter<L = NoLogo, S = XlsxSerializer> {
    layout: SheetLayout,
    logo_source: L,
    serializer: S,
}

impl ScheduleExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: LogoSource, S: WorkbookSerializer> ScheduleExporter<L, S> {
    /// Use a different sheet layout
    pub fn layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Fetch logos from `source`
    pub fn logo_source<L2: LogoSource>(self, source: L2) -> ScheduleExporter<L2, S> {
        ScheduleExporter {
            layout: self.layout,
            logo_source: source,
            serializer: self.serializer,
        }
    }

    /// Serialize with `serializer`
    pub fn serializer<S2: WorkbookSerializer>(self, serializer: S2) -> ScheduleExporter<L, S2> {
        ScheduleExporter {
            layout: self.layout,
            logo_source: self.logo_source,
            serializer,
        }
    }

    /// Export with today's local date in the footer and default file name
    pub fn export(
        &self,
        options: &ExportOptions,
        sink: &mut impl FileSink,
    ) -> Result<ExportReport, ExportError> {
        self.export_on(options, sink, Local::now().date_naive())
    }

    /// Export as if run on `today`
    pub fn export_on(
        &self,
        options: &ExportOptions,
        sink: &mut impl FileSink,
        today: NaiveDate,
    ) -> Result<ExportReport, ExportError> {
        self.try_export(options, sink, today).map_err(|err| {
            error!(error = %err, "Export XLSX error");
            ExportError::from(err)
        })
    }

    /// Produce the workbook bytes without handing them to a sink
    pub fn render(&self, options: &ExportOptions, today: NaiveDate) -> Result<Vec<u8>, ExportError> {
        self.try_render(options, today)
            .map(|(bytes, _)| bytes)
            .map_err(|err| {
                error!(error = %err, "Export XLSX error");
                ExportError::from(err)
            })
    }

    fn try_export(
        &self,
        options: &ExportOptions,
        sink: &mut impl FileSink,
        today: NaiveDate,
    ) -> Result<ExportReport, BuildError> {
        let (bytes, logo_fetched) = self.try_render(options, today)?;

        let filename = options
            .filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| default_filename(today), str::to_string);

        sink.save(&bytes, &filename, XLSX_MIME_TYPE)?;
        info!(filename = %filename, bytes = bytes.len(), "guard plan exported");

        Ok(ExportReport {
            filename,
            sheets: options.guard_days.len(),
            bytes: bytes.len(),
            logo_fetched,
        })
    }

    fn try_render(
        &self,
        options: &ExportOptions,
        today: NaiveDate,
    ) -> Result<(Vec<u8>, bool), BuildError> {
        // Reject bad input before touching the logo source
        options.validate()?;

        let logo = self.fetch_logo(&options.logo_path);
        let logo_fetched = logo.is_some();
        let plan = self.layout.plan(options, logo, today)?;
        let bytes = self.serializer.serialize(&plan)?;
        Ok((bytes, logo_fetched))
    }

    fn fetch_logo(&self, locator: &str) -> Option<Vec<u8>> {
        if locator.trim().is_empty() {
            debug!("no logo configured");
            return None;
        }
        match self.logo_source.fetch(locator) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(locator, error = %err, "logo not loaded, exporting without logo");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySink;
    use crate::plan::WorkbookPlan;
    use guardplan_core::{
        ExportErrorKind, FetchError, GuardPair, GuardPerDay, GuardPeriod, StaticLogo,
    };
    use std::cell::Cell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn options() -> ExportOptions {
        ExportOptions::new(
            vec![
                GuardPerDay::new("Lundi")
                    .pair(GuardPair::new("A / B").period(GuardPeriod::new("Poste"))),
                GuardPerDay::new("Mardi"),
            ],
            60,
            24,
        )
        .logo_path("/logo.png")
    }

    /// Counts fetches so tests can check the logo is loaded once
    #[derive(Default)]
    struct CountingLogo {
        calls: Cell<usize>,
    }

    impl LogoSource for CountingLogo {
        fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Err(FetchError::NotFound(locator.to_string()))
        }
    }

    struct FailingSerializer;

    impl WorkbookSerializer for FailingSerializer {
        fn serialize(&self, _plan: &WorkbookPlan) -> Result<Vec<u8>, BuildError> {
            Err(BuildError::Serialize("disk full".into()))
        }
    }

    struct FailingSink;

    impl FileSink for FailingSink {
        fn save(&mut self, _bytes: &[u8], _filename: &str, _mime: &str) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn default_filename_is_date_stamped() {
        assert_eq!(default_filename(today()), "plan-de-garde-2026-10-18.xlsx");
    }

    #[test]
    fn export_hands_xlsx_to_sink() {
        let mut sink = MemorySink::default();
        let report = ScheduleExporter::new()
            .export_on(&options(), &mut sink, today())
            .unwrap();

        assert_eq!(report.filename, "plan-de-garde-2026-10-18.xlsx");
        assert_eq!(report.sheets, 2);
        assert!(!report.logo_fetched);

        let saved = sink.last().unwrap();
        assert_eq!(saved.filename, report.filename);
        assert_eq!(saved.mime_type, XLSX_MIME_TYPE);
        assert_eq!(saved.bytes.len(), report.bytes);
        assert_eq!(&saved.bytes[0..2], b"PK");
    }

    #[test]
    fn caller_filename_wins() {
        let mut sink = MemorySink::default();
        let options = options().filename("semaine-20.xlsx");
        let report = ScheduleExporter::new()
            .export_on(&options, &mut sink, today())
            .unwrap();
        assert_eq!(report.filename, "semaine-20.xlsx");
    }

    #[test]
    fn blank_filename_falls_back_to_default() {
        let mut sink = MemorySink::default();
        let options = options().filename("  ");
        let report = ScheduleExporter::new()
            .export_on(&options, &mut sink, today())
            .unwrap();
        assert_eq!(report.filename, "plan-de-garde-2026-10-18.xlsx");
    }

    #[test]
    fn empty_plan_is_a_validation_error_and_nothing_is_fetched_or_saved() {
        let mut sink = MemorySink::default();
        let exporter = ScheduleExporter::new().logo_source(CountingLogo::default());
        let options = ExportOptions::new(Vec::new(), 60, 24).logo_path("/logo.png");

        let err = exporter.export_on(&options, &mut sink, today()).unwrap_err();
        assert_eq!(err.kind, ExportErrorKind::Validation);
        assert_eq!(err.to_string(), "export failed: no data to export");
        assert!(sink.saved.is_empty());
        assert_eq!(exporter.logo_source.calls.get(), 0);
    }

    #[test]
    fn unreachable_logo_is_fetched_once_and_export_succeeds() {
        let mut sink = MemorySink::default();
        let exporter = ScheduleExporter::new().logo_source(CountingLogo::default());

        let report = exporter.export_on(&options(), &mut sink, today()).unwrap();
        assert!(!report.logo_fetched);
        assert_eq!(exporter.logo_source.calls.get(), 1);
        assert_eq!(sink.saved.len(), 1);
    }

    #[test]
    fn fetched_logo_is_reported() {
        let mut sink = MemorySink::default();
        let exporter = ScheduleExporter::new().logo_source(StaticLogo(b"not a png".to_vec()));

        // Undecodable bytes still export, the serializer drops the image
        let report = exporter.export_on(&options(), &mut sink, today()).unwrap();
        assert!(report.logo_fetched);
    }

    #[test]
    fn serializer_failure_is_wrapped() {
        let mut sink = MemorySink::default();
        let exporter = ScheduleExporter::new().serializer(FailingSerializer);

        let err = exporter.export_on(&options(), &mut sink, today()).unwrap_err();
        assert_eq!(err.kind, ExportErrorKind::Serialize);
        assert!(err.reason.contains("disk full"));
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn sink_failure_is_wrapped() {
        let err = ScheduleExporter::new()
            .export_on(&options(), &mut FailingSink, today())
            .unwrap_err();
        assert_eq!(err.kind, ExportErrorKind::Save);
        assert!(err.reason.contains("read-only"));
    }

    #[test]
    fn render_returns_bytes_without_sink() {
        let bytes = ScheduleExporter::new().render(&options(), today()).unwrap();
        assert_eq!(&bytes[0..2], b"PK");

        let err = ScheduleExporter::new()
            .render(&ExportOptions::new(Vec::new(), 60, 24), today())
            .unwrap_err();
        assert!(err.is_validation());
    }
}
