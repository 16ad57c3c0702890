//! Map file loaders and the extension-based dispatcher in front of them.

/// `.json` / `.tmj` maps.
pub mod json_loader;
/// `.tmx` / `.xml` maps.
pub mod xml_loader;

use crate::error::MapError;
use crate::ir_map::IrMap;
use crate::map::TmxMap;
use log::debug;
use std::path::Path;

/// Supported map serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// `.json`, `.tmj`
    Json,
    /// `.tmx`, `.xml`
    Xml,
}

impl MapFormat {
    /// Extensions registered for each format, lowercase.
    pub const REGISTRY: &'static [(&'static str, MapFormat)] = &[
        ("json", MapFormat::Json),
        ("tmj", MapFormat::Json),
        ("tmx", MapFormat::Xml),
        ("xml", MapFormat::Xml),
    ];

    /// Picks the format from the file extension, case-insensitively.
    /// Never touches the file itself.
    pub fn from_path(path: &Path) -> Result<Self, MapError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        ext.and_then(|ext| {
            Self::REGISTRY
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|&(_, format)| format)
        })
        .ok_or_else(|| MapError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }

    /// Reads `path` into the intermediate shape.
    pub fn parse(self, path: &Path) -> Result<IrMap, MapError> {
        match self {
            MapFormat::Json => json_loader::decode_map_file_to_ir(path),
            MapFormat::Xml => xml_loader::decode_map_file_to_ir(path),
        }
    }

    /// Same as [`MapFormat::parse`] for a document already in memory.
    pub fn parse_str(self, text: &str, path: &Path) -> Result<IrMap, MapError> {
        match self {
            MapFormat::Json => json_loader::decode_map_str_to_ir(text, path),
            MapFormat::Xml => xml_loader::decode_map_str_to_ir(text, path),
        }
    }
}

/// Loads any supported map file into a [`TmxMap`].
pub fn load_map(path: impl AsRef<Path>) -> Result<TmxMap, MapError> {
    let path = path.as_ref();
    let format = MapFormat::from_path(path)?;
    debug!("loading {:?} map {}", format, path.display());
    TmxMap::from_ir(format.parse(path)?)
}
