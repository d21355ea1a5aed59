//! Layout configuration
//!
//! Everything the layout treats as a constant lives here so a host can
//! restyle the sheet without touching the algorithm. Every field has a
//! default, so a partial JSON document is a valid configuration.

use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{RendererError, RendererResult};
use crate::types::{Color, Margins, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    /// Header band, table head row and section titles
    pub accent: String,
    /// Every second table body row
    pub stripe: String,
    pub text: String,
    /// Captions, placeholders and the footer
    pub muted: String,
    /// Separator and signature lines
    pub rule: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: "#00529B".to_string(),
            stripe: "#EEF3FA".to_string(),
            text: "#1E1E1E".to_string(),
            muted: "#6E6E6E".to_string(),
            rule: "#B4B4B4".to_string(),
        }
    }
}

/// Palette with every hex string parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPalette {
    pub accent: Color,
    pub stripe: Color,
    pub text: Color,
    pub muted: Color,
    pub rule: Color,
}

impl Palette {
    pub fn resolve(&self) -> RendererResult<ResolvedPalette> {
        let parse = |name: &str, value: &str| {
            Color::from_hex(value).map_err(|e| RendererError::ConfigError(format!("palette.{}: {}", name, e)))
        };
        Ok(ResolvedPalette {
            accent: parse("accent", &self.accent)?,
            stripe: parse("stripe", &self.stripe)?,
            text: parse("text", &self.text)?,
            muted: parse("muted", &self.muted)?,
            rule: parse("rule", &self.rule)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Page size in millimetres
    pub page_size: Size,
    pub margins: Margins,
    pub header_height: f64,
    pub palette: Palette,
    pub brand_wordmark: String,
    pub sheet_title: String,
    /// Prepended to the location slug to form the download filename
    pub filename_prefix: String,
    /// Offset from UTC used for every printed date, in minutes
    pub utc_offset_minutes: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: Size::a4(),
            margins: Margins::new(20.0, 18.0, 15.0, 15.0),
            header_height: 28.0,
            palette: Palette::default(),
            brand_wordmark: "ANODE Lite".to_string(),
            sheet_title: "Ficha Técnica do Quadro de Distribuição".to_string(),
            filename_prefix: "ficha-tecnica_".to_string(),
            // Brasília time
            utc_offset_minutes: -180,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> RendererResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> RendererResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn content_width(&self) -> f64 {
        self.page_size.width - self.margins.left - self.margins.right
    }

    /// Lowest y content may reach before the footer area
    pub fn content_bottom(&self) -> f64 {
        self.page_size.height - self.margins.bottom
    }

    pub fn utc_offset(&self) -> RendererResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            RendererError::ConfigError(format!("utcOffsetMinutes out of range: {}", self.utc_offset_minutes))
        })
    }

    pub fn validate(&self) -> RendererResult<()> {
        let Size { width, height } = self.page_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(RendererError::ConfigError(format!("page size must be positive, got {}x{}", width, height)));
        }
        let m = self.margins;
        if [m.top, m.bottom, m.left, m.right].iter().any(|v| *v < 0.0) {
            return Err(RendererError::ConfigError("margins must not be negative".to_string()));
        }
        if self.content_width() <= 0.0 {
            return Err(RendererError::ConfigError("margins leave no content width".to_string()));
        }
        if self.header_height <= 0.0 || self.header_height + m.bottom >= height {
            return Err(RendererError::ConfigError(format!("header height {} does not fit the page", self.header_height)));
        }
        self.palette.resolve()?;
        self.utc_offset()?;
        Ok(())
    }
}
