use crate::compositor::{Canvas, CompositeOptions, Compositor, LayerNames};
use crate::error::MapError;
use crate::export::IndexedImage;
use crate::loader::load_map;
use crate::map::TmxMap;
use crate::tileset::{IndexedTileset, TileSource};
use log::info;
use std::io;
use std::path::Path;

/// One map plus one tileset, ready to be baked into an image.
pub struct MapImageBuilder<T: TileSource = IndexedTileset> {
    map: TmxMap,
    tileset: T,
    compositor: Compositor,
}

impl MapImageBuilder<IndexedTileset> {
    /// Loads a map file and an indexed PNG tileset cut at the map's tile size.
    pub fn open(
        map_path: impl AsRef<Path>,
        tileset_path: impl AsRef<Path>,
        names: LayerNames,
    ) -> Result<Self, MapError> {
        let (map_path, tileset_path) = (map_path.as_ref(), tileset_path.as_ref());
        for path in [map_path, tileset_path] {
            if !path.exists() {
                return Err(MapError::io(path, io::Error::from(io::ErrorKind::NotFound)));
            }
        }

        info!("reading map {}", map_path.display());
        let map = load_map(map_path)?;
        let tileset = IndexedTileset::open(map.tile_size(), tileset_path)?;
        Ok(Self::new(
            map,
            tileset,
            CompositeOptions {
                names,
                ..Default::default()
            },
        ))
    }
}

impl<T: TileSource> MapImageBuilder<T> {
    /// Pairs an already loaded map with any tile source.
    pub fn new(map: TmxMap, tileset: T, options: CompositeOptions) -> Self {
        Self {
            map,
            tileset,
            compositor: Compositor::new(options),
        }
    }

    /// The loaded map.
    pub fn map(&self) -> &TmxMap {
        &self.map
    }

    /// The tile source.
    pub fn tileset(&self) -> &T {
        &self.tileset
    }

    /// Composites a new canvas; nothing is cached between calls.
    pub fn build(&self) -> Result<Canvas, MapError> {
        self.compositor.composite(&self.map, &self.tileset)
    }

    /// Builds the canvas and writes it as an indexed PNG with the tileset palette.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let image = IndexedImage::new(self.build()?, self.tileset.palette())?;
        image.save(path)
    }
}
