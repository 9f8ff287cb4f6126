//! WebAssembly bindings for guardplan
//!
//! The browser side fetches the logo, calls [`GuardPlanExporter::export_xlsx`]
//! with the plan as JSON and wraps the returned bytes in a `Blob` for download
//! under [`GuardPlanExporter::filename`].

use chrono::Local;
use guardplan_core::{period_label, ExportOptions, StaticLogo};
use guardplan_render::{default_filename as dated_filename, MemorySink, SavedFile, ScheduleExporter};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// File name used when the plan does not name one
#[wasm_bindgen]
pub fn default_filename() -> String {
    dated_filename(Local::now().date_naive())
}

/// Period header labels as a JSON array of strings
#[wasm_bindgen]
pub fn period_labels(period_duration: u32, period_count: u16) -> String {
    let labels: Vec<String> = (0..period_count)
        .map(|index| period_label(index, period_duration))
        .collect();
    serde_json::to_string(&labels).unwrap_or_else(|_| "[]".into())
}

/// Guard plan exporter for the browser
#[wasm_bindgen]
pub struct GuardPlanExporter {
    logo: Option<Vec<u8>>,
    last_error: Option<String>,
    filename: Option<String>,
    mime_type: Option<String>,
}

impl Default for GuardPlanExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl GuardPlanExporter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            logo: None,
            last_error: None,
            filename: None,
            mime_type: None,
        }
    }

    /// Logo bytes fetched by the caller; shared by every sheet
    pub fn set_logo(&mut self, bytes: Vec<u8>) {
        self.logo = Some(bytes);
    }

    pub fn clear_logo(&mut self) {
        self.logo = None;
    }

    /// Export the plan (JSON) to XLSX bytes.
    ///
    /// Returns an empty array on failure; the reason is available from
    /// `get_last_error`.
    pub fn export_xlsx(&mut self, options_json: &str) -> Vec<u8> {
        match self.export_internal(options_json) {
            Ok(saved) => {
                self.last_error = None;
                self.filename = Some(saved.filename);
                self.mime_type = Some(saved.mime_type);
                saved.bytes
            }
            Err(e) => {
                self.last_error = Some(e);
                self.filename = None;
                self.mime_type = None;
                Vec::new()
            }
        }
    }

    /// File name of the last successful export
    pub fn filename(&self) -> Option<String> {
        self.filename.clone()
    }

    /// MIME type of the last successful export
    pub fn mime_type(&self) -> Option<String> {
        self.mime_type.clone()
    }

    pub fn get_last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

impl GuardPlanExporter {
    fn export_internal(&self, options_json: &str) -> Result<SavedFile, String> {
        let options: ExportOptions = serde_json::from_str(options_json)
            .map_err(|e| format!("Invalid guard plan: {}", e))?;

        let logo = StaticLogo(self.logo.clone().unwrap_or_default());
        let exporter = ScheduleExporter::new().logo_source(logo);

        let mut sink = MemorySink::default();
        exporter
            .export_on(&options, &mut sink, Local::now().date_naive())
            .map_err(|e| e.to_string())?;

        sink.take_last()
            .ok_or_else(|| "export produced no file".to_string())
    }
}
