//! Word templates (.dotx/.docx) used as the output shell
//!
//! # Example
//!
//! ```ignore
//! use tagdoc_ooxml::Template;
//!
//! let mut template = Template::load("corporate.dotx")?;
//! println!("Template defines {} styles", template.get_styles()?.len());
//! ```

use std::io::Cursor;
use std::path::Path;

use crate::archive::OoxmlArchive;
use crate::error::Result;
use crate::package;
use crate::styles::StyleSheet;

/// A Word template whose styles and package parts wrap the output
#[derive(Debug)]
pub struct Template {
    archive: OoxmlArchive,
    /// Parsed stylesheet (cached)
    stylesheet: Option<StyleSheet>,
}

impl Template {
    /// Load a template from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading template {}", path.display());
        Ok(Self::from_archive(OoxmlArchive::open(path)?))
    }

    /// Load a template from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_archive(OoxmlArchive::from_reader(Cursor::new(
            bytes,
        ))?))
    }

    /// The built-in minimal package
    pub fn builtin() -> Self {
        Self::from_archive(package::minimal_package())
    }

    fn from_archive(mut archive: OoxmlArchive) -> Self {
        package::prepare_package(&mut archive);
        Self {
            archive,
            stylesheet: None,
        }
    }

    /// Parsed stylesheet, cached after the first call
    pub fn get_styles(&mut self) -> Result<&StyleSheet> {
        let stylesheet = match self.stylesheet.take() {
            Some(stylesheet) => stylesheet,
            None => StyleSheet::parse(self.archive.styles_xml()?)?,
        };
        Ok(&*self.stylesheet.insert(stylesheet))
    }

    /// Check if a style ID exists in the template
    pub fn has_style(&mut self, style_id: &str) -> Result<bool> {
        Ok(self.get_styles()?.get(style_id).is_some())
    }

    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Consume the template and return the package
    pub fn into_archive(self) -> OoxmlArchive {
        self.archive
    }
}
