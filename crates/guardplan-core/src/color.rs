//! Colour tags used to highlight schedule cells
//!
//! The planning UI tags each assignment with a CSS background class. Only a
//! small, closed set of classes has a spreadsheet equivalent; anything else is
//! exported without a fill.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A colour in Excel's ARGB notation (`0xAARRGGBB`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argb(pub u32);

impl Argb {
    /// The colour without its alpha channel (`0xRRGGBB`)
    pub const fn rgb(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Known highlight classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorTag {
    Emerald,
    Orange,
    Purple,
    Sky,
    Yellow,
}

impl ColorTag {
    pub const ALL: [ColorTag; 5] = [
        ColorTag::Emerald,
        ColorTag::Orange,
        ColorTag::Purple,
        ColorTag::Sky,
        ColorTag::Yellow,
    ];

    /// Look up a tag by its class name
    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.class() == class)
    }

    /// Class name as emitted by the planning UI
    pub const fn class(self) -> &'static str {
        match self {
            ColorTag::Emerald => "bg-emerald-200",
            ColorTag::Orange => "bg-orange-200",
            ColorTag::Purple => "bg-purple-200",
            ColorTag::Sky => "bg-sky-200",
            ColorTag::Yellow => "bg-yellow-200",
        }
    }

    /// Fill colour of the tag
    pub const fn argb(self) -> Argb {
        match self {
            ColorTag::Emerald => Argb(0xFFA7_F3D0),
            ColorTag::Orange => Argb(0xFFFE_D7AA),
            ColorTag::Purple => Argb(0xFFE9_D5FF),
            ColorTag::Sky => Argb(0xFFBA_E6FD),
            ColorTag::Yellow => Argb(0xFFFE_F08A),
        }
    }
}

/// Resolve an optional class to a fill colour; unknown classes have none
pub fn resolve_fill(class: Option<&str>) -> Option<Argb> {
    class.and_then(ColorTag::from_class).map(ColorTag::argb)
}
