use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`MapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized extension, malformed document, unsupported layer type or bad tile data.
    Format,
    /// A layer or object asked for by id/name does not exist.
    Lookup,
    /// Reading the source or writing the destination failed.
    Io,
    /// The tileset image or palette cannot serve the request.
    Tileset,
}

/// Error type for loading, compositing and exporting a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// Extension is not one of `.json`, `.tmj`, `.tmx`, `.xml`.
    #[error("Unrecognized file format: {}", .path.display())]
    UnsupportedFormat {
        /// Offending path
        path: PathBuf,
    },
    /// File I/O error
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// JSON parse error
    #[error("Failed to parse JSON map {}: {source}", .path.display())]
    Json {
        /// Map file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// XML parse error
    #[error("Failed to parse XML map {}: {source}", .path.display())]
    Xml {
        /// Map file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: roxmltree::Error,
    },
    /// An attribute that must be numeric is not.
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        /// Tag name
        element: String,
        /// Attribute name
        attribute: String,
        /// Raw text
        value: String,
    },
    /// Layer `type` other than `tilelayer` / `objectgroup`.
    #[error("Unsupported layer type {0}")]
    UnsupportedLayerType(String),
    /// Tile layer payload cannot be decoded.
    #[error("Invalid tile data: {0}")]
    InvalidTileData(String),
    /// A cell carries flip flags and the decoder is set to reject them.
    #[error("Tile {gid:#010x} is flipped/rotated, which is not supported")]
    FlippedTile {
        /// Raw cell value
        gid: u32,
    },
    /// No layer of the requested type has this name.
    #[error("Layer '{0}' not found in the map file.")]
    LayerNotFound(String),
    /// No object layer holds an object with this id.
    #[error("Object with id: {0} not found in the map.")]
    ObjectIdNotFound(u32),
    /// No object layer holds an object with this name.
    #[error("Object with name: {0} not found in the map.")]
    ObjectNameNotFound(String),
    /// Tileset image problem or out-of-range tile lookup.
    #[error("Tileset error: {0}")]
    Tileset(String),
    /// Indexed output supports at most 256 colors.
    #[error("Palette has {0} entries, indexed output allows at most 256")]
    InvalidPalette(usize),
    /// PNG encoder failure while writing the output image.
    #[error("Failed to write image {}: {source}", .path.display())]
    Export {
        /// Destination file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: png::EncodingError,
    },
}

impl MapError {
    /// Which family of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapError::UnsupportedFormat { .. }
            | MapError::Json { .. }
            | MapError::Xml { .. }
            | MapError::InvalidAttribute { .. }
            | MapError::UnsupportedLayerType(_)
            | MapError::InvalidTileData(_)
            | MapError::FlippedTile { .. } => ErrorKind::Format,
            MapError::LayerNotFound(_)
            | MapError::ObjectIdNotFound(_)
            | MapError::ObjectNameNotFound(_) => ErrorKind::Lookup,
            MapError::Io { .. } | MapError::Export { .. } => ErrorKind::Io,
            MapError::Tileset(_) | MapError::InvalidPalette(_) => ErrorKind::Tileset,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MapError::Io {
            path: path.into(),
            source,
        }
    }
}
