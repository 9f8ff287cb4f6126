//! # guardplan-core
//!
//! Core domain model and traits for guard duty plan exports.
//!
//! This crate provides:
//! - Domain types: `GuardPeriod`, `GuardPair`, `GuardPerDay`, `ExportOptions`
//! - Colour tags: the closed mapping from cell classes to fill colours
//! - Time helpers: `decimal_to_time`, period labels, long French dates
//! - Collaborator traits: `LogoSource`, `FileSink`
//! - Error types shared by the render pipeline
//!
//! ## Example
//!
//! ```rust
//! use guardplan_core::{ExportOptions, GuardPair, GuardPerDay, GuardPeriod};
//!
//! let day = GuardPerDay::new("Lundi 12.05")
//!     .pair(
//!         GuardPair::new("Muller / Rossi")
//!             .period(GuardPeriod::new("Poste").class("bg-sky-200"))
//!             .period(GuardPeriod::new("Repos")),
//!     );
//!
//! let options = ExportOptions::new(vec![day], 60, 24)
//!     .officer("Lt Favre")
//!     .commander("Sgt Meier");
//!
//! assert!(options.validate().is_ok());
//! ```

pub mod color;
pub mod time;

pub use color::{resolve_fill, Argb, ColorTag};
pub use time::{decimal_to_time, long_french_date, period_label, HOURS_PER_DAY};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type of the produced workbook
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Highest number of period columns a sheet can hold (XLSX has 16 384 columns,
/// one of which is the pair-name column)
pub const MAX_PERIOD_COUNT: u16 = 16_383;

// ============================================================================
// Guard Schedule
// ============================================================================

/// One time-slot assignment for one pair on one day
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPeriod {
    /// Assignment label shown in the cell
    pub name: String,
    /// Optional colour tag (e.g. `bg-emerald-200`)
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl GuardPeriod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: None,
        }
    }

    /// Set the colour tag
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Fill colour of the cell, if the tag is a known one
    pub fn fill(&self) -> Option<Argb> {
        resolve_fill(self.class.as_deref())
    }
}

/// A soldier pair's full-day assignment row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPair {
    pub name: String,
    /// Assignments indexed by period; may be shorter than the period count
    #[serde(default)]
    pub period: Vec<GuardPeriod>,
}

impl GuardPair {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            period: Vec::new(),
        }
    }

    /// Append the next period assignment
    pub fn period(mut self, period: GuardPeriod) -> Self {
        self.period.push(period);
        self
    }
}

/// One day's full schedule, exported as one sheet
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPerDay {
    /// Day label, also used as the sheet name
    pub date: String,
    #[serde(default)]
    pub pair: Vec<GuardPair>,
}

impl GuardPerDay {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            pair: Vec::new(),
        }
    }

    /// Append a pair row
    pub fn pair(mut self, pair: GuardPair) -> Self {
        self.pair.push(pair);
        self
    }
}

/// Everything needed to export a guard plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub guard_days: Vec<GuardPerDay>,
    /// Minutes per period
    pub period_duration: u32,
    /// Number of time columns
    pub period_count: u16,
    #[serde(default)]
    pub officer: String,
    #[serde(default)]
    pub commander: String,
    /// Locator of the logo image (path or URL, interpreted by the `LogoSource`)
    #[serde(default)]
    pub logo_path: String,
    /// Suggested file name; a date-stamped default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ExportOptions {
    pub fn new(guard_days: Vec<GuardPerDay>, period_duration: u32, period_count: u16) -> Self {
        Self {
            guard_days,
            period_duration,
            period_count,
            officer: String::new(),
            commander: String::new(),
            logo_path: String::new(),
            filename: None,
        }
    }

    pub fn officer(mut self, officer: impl Into<String>) -> Self {
        self.officer = officer.into();
        self
    }

    pub fn commander(mut self, commander: impl Into<String>) -> Self {
        self.commander = commander.into();
        self
    }

    pub fn logo_path(mut self, logo_path: impl Into<String>) -> Self {
        self.logo_path = logo_path.into();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Check the preconditions of an export.
    ///
    /// Runs before any resource is touched: an empty plan, a zero period
    /// count or duration, and pairs with more periods than there are columns
    /// are all rejected.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.guard_days.is_empty() {
            return Err(BuildError::Validation("no data to export".into()));
        }
        if self.period_count == 0 {
            return Err(BuildError::Validation(
                "period count must be greater than zero".into(),
            ));
        }
        if self.period_count > MAX_PERIOD_COUNT {
            return Err(BuildError::Validation(format!(
                "period count {} exceeds the {} columns a sheet can hold",
                self.period_count, MAX_PERIOD_COUNT
            )));
        }
        if self.period_duration == 0 {
            return Err(BuildError::Validation(
                "period duration must be greater than zero".into(),
            ));
        }

        for day in &self.guard_days {
            for pair in &day.pair {
                if pair.period.len() > usize::from(self.period_count) {
                    return Err(BuildError::Validation(format!(
                        "pair '{}' on '{}' has {} periods but only {} columns exist",
                        pair.name,
                        day.date,
                        pair.period.len(),
                        self.period_count
                    )));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Source of the logo image embedded at the top of every sheet
pub trait LogoSource {
    /// Fetch the raw image bytes behind `locator`
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError>;
}

/// A source that never has a logo
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLogo;

impl LogoSource for NoLogo {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::NotFound(locator.to_string()))
    }
}

/// In-memory logo, for callers that already hold the bytes
#[derive(Clone, Debug, Default)]
pub struct StaticLogo(pub Vec<u8>);

impl LogoSource for StaticLogo {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        if self.0.is_empty() {
            return Err(FetchError::NotFound(locator.to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Destination of the finished workbook ("save as file")
pub trait FileSink {
    /// Hand over the workbook bytes under the suggested file name
    fn save(&mut self, bytes: &[u8], filename: &str, mime_type: &str) -> std::io::Result<()>;
}

// ============================================================================
// Errors
// ============================================================================

/// Logo fetch failure; never fatal to an export
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("logo not found: {0}")]
    NotFound(String),

    #[error("unsupported logo locator: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure inside the export pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Validation(String),

    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error("saving failed: {0}")]
    Save(#[from] std::io::Error),
}

/// Category of an [`ExportError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportErrorKind {
    /// The input was rejected before any work was done
    Validation,
    /// The workbook could not be produced
    Serialize,
    /// The workbook could not be handed to the sink
    Save,
}

/// The single error type callers of an export ever see
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("export failed: {reason}")]
pub struct ExportError {
    pub kind: ExportErrorKind,
    pub reason: String,
}

impl ExportError {
    pub fn is_validation(&self) -> bool {
        self.kind == ExportErrorKind::Validation
    }
}

impl From<BuildError> for ExportError {
    fn from(err: BuildError) -> Self {
        let kind = match err {
            BuildError::Validation(_) => ExportErrorKind::Validation,
            BuildError::Serialize(_) => ExportErrorKind::Serialize,
            BuildError::Save(_) => ExportErrorKind::Save,
        };
        Self {
            kind,
            reason: err.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
