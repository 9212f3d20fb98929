//! Session settings
//!
//! A `tagdoc.toml` file deserializes into [`Settings`]. Every table is
//! optional, so a file only needs to name what it changes:
//!
//! ```toml
//! [tags.headings]
//! headline = 1
//!
//! [tags]
//! ignore = ["sidebar"]
//!
//! [template]
//! company = "Acme"
//! generate-toc = false
//!
//! [page]
//! landscape = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::{TagMapping, TagMappingConfig};
use crate::composer::TemplateConfig;
use crate::error::Result;

/// Default config file name looked up next to input files
pub const CONFIG_FILE_NAME: &str = "tagdoc.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tag mapping overrides applied on top of the built-in table
    pub tags: TagMappingConfig,
    /// Composition options
    pub template: TemplateConfig,
    /// Output page geometry
    pub page: PageSetup,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Built-in tag mapping with the configured overrides applied
    pub fn tag_mapping(&self) -> TagMapping {
        TagMapping::from_config(&self.tags)
    }
}

/// Page size and margins in twentieths of a point (twips)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    /// Swap width and height when writing the page size
    pub landscape: bool,
}

impl Default for PageSetup {
    /// A4 portrait with one inch margins
    fn default() -> Self {
        Self {
            width: 11906,
            height: 16838,
            margin_top: 1440,
            margin_right: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            landscape: false,
        }
    }
}

impl PageSetup {
    /// Effective `(width, height)` after applying orientation
    pub fn dimensions(&self) -> (u32, u32) {
        let (short, long) = if self.width <= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        if self.landscape {
            (long, short)
        } else {
            (short, long)
        }
    }
}
