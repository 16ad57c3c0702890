#![warn(missing_docs)]

//! Bakes Tiled maps (JSON or TMX) into a single palette-indexed PNG.
//!
//! Tile layers named as the low- and high-priority planes are composited in
//! file order through a [`TileSource`]; everything else in the map is loaded
//! into the [`TmxMap`] model but not drawn.

mod builder;
mod codec;
mod compositor;
mod error;
mod export;
mod gid;
#[allow(missing_docs)]
pub mod ir_map;
mod layer;
pub mod loader;
mod map;
mod object;
mod property;
mod size;
mod tileset;

pub use builder::MapImageBuilder;
pub use codec::{decode_cells, encode_cells, Compression, DecodeOptions, FlipPolicy};
pub use compositor::{Canvas, CompositeOptions, Compositor, LayerNames};
pub use error::{ErrorKind, MapError};
pub use export::{IndexedImage, MAX_PALETTE_LEN};
pub use gid::{TileId, FLIP_D, FLIP_H, FLIP_MASK, FLIP_V, GID_MASK};
pub use layer::{Layer, LayerInfo, LayerType, ObjectLayer, TileLayer};
pub use loader::{load_map, MapFormat};
pub use map::{TilesetRef, TmxMap};
pub use object::{Object, ObjectShape, Point};
pub use property::{find_property, CustomProperty};
pub use size::Size;
pub use tileset::{IndexedTileset, Priority, Rgb, TileSource, PRIORITY_BIT};
