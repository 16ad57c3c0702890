use crate::codec::DecodeOptions;
use crate::error::MapError;
use crate::gid::TileId;
use crate::layer::TileLayer;
use crate::map::TmxMap;
use crate::size::Size;
use crate::tileset::{Priority, TileSource};
use log::{debug, trace, warn};

/// Layer names that select the low- and high-priority planes. Exact,
/// case-sensitive matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNames {
    /// Drawn with [`Priority::Lo`].
    pub lo: String,
    /// Drawn with [`Priority::Hi`].
    pub hi: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        Self {
            lo: "LO".to_owned(),
            hi: "HI".to_owned(),
        }
    }
}

impl LayerNames {
    /// Low- and high-priority layer names, in that order.
    pub fn new(lo: impl Into<String>, hi: impl Into<String>) -> Self {
        Self {
            lo: lo.into(),
            hi: hi.into(),
        }
    }

    /// Priority for a layer name, `None` if the layer is not composited.
    pub fn priority_of(&self, name: &str) -> Option<Priority> {
        if name == self.lo {
            Some(Priority::Lo)
        } else if name == self.hi {
            Some(Priority::Hi)
        } else {
            None
        }
    }
}

/// Everything that steers a [`Compositor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeOptions {
    /// Which layers are drawn, and at which priority.
    pub names: LayerNames,
    /// How tile layer payloads are decoded.
    pub decode: DecodeOptions,
}

/// Row-major buffer of palette indices, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Value of every pixel no tile was written to.
    pub const BACKGROUND: u8 = 0;

    /// Blank canvas of `size`. Callers bound the size first, see
    /// [`TmxMap::size_in_px`].
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pixels: vec![Self::BACKGROUND; size.area()],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas extent in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.height, self.width)
    }

    /// Row-major pixel indices.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Takes the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at `(x, y)`, `None` outside the canvas.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Whether a non-empty `block_size` block at `(x, y)` lies fully inside the canvas.
    pub fn fits(&self, x: u64, y: u64, block_size: Size) -> bool {
        !block_size.is_empty()
            && x + block_size.width as u64 <= self.width as u64
            && y + block_size.height as u64 <= self.height as u64
    }

    /// Copies a `block_size` block to `(x, y)` if it fits entirely; otherwise
    /// writes nothing and returns `false`.
    pub fn blit(&mut self, x: u64, y: u64, block_size: Size, block: &[u8]) -> bool {
        if !self.fits(x, y, block_size) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let (bw, bh) = (block_size.width as usize, block_size.height as usize);
        let stride = self.width as usize;
        for (row, src) in block.chunks_exact(bw).take(bh).enumerate() {
            let start = (y + row) * stride + x;
            self.pixels[start..start + bw].copy_from_slice(src);
        }
        true
    }
}

/// Flattens the LO/HI tile layers of a map into one [`Canvas`].
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    options: CompositeOptions,
}

impl Compositor {
    /// Compositor using `options` for every map.
    pub fn new(options: CompositeOptions) -> Self {
        Self { options }
    }

    /// Options this compositor was built with.
    pub fn options(&self) -> &CompositeOptions {
        &self.options
    }

    /// Builds a fresh canvas sized from the map's declared grid and tile size.
    ///
    /// Layers are applied in file order, so a later matching layer overwrites an
    /// earlier one wherever it has a tile, regardless of LO/HI. Tiles that would
    /// not fit entirely inside the canvas are dropped.
    ///
    /// The tileset must be cut at the map's tile size.
    pub fn composite(&self, map: &TmxMap, tileset: &impl TileSource) -> Result<Canvas, MapError> {
        if tileset.tile_size() != map.tile_size() {
            return Err(MapError::Tileset(format!(
                "tileset tiles are {}, map tiles are {}",
                tileset.tile_size(),
                map.tile_size()
            )));
        }
        let mut canvas = Canvas::new(map.size_in_px()?);
        debug!("compositing {} canvas", canvas.size());

        for layer in map.tile_layers() {
            match self.options.names.priority_of(layer.name()) {
                Some(priority) => {
                    debug!("layer '{}' -> {:?}", layer.name(), priority);
                    self.stack_layer(&mut canvas, map, layer, priority, tileset)?;
                }
                None => debug!("layer '{}' skipped", layer.name()),
            }
        }
        Ok(canvas)
    }

    fn stack_layer(
        &self,
        canvas: &mut Canvas,
        map: &TmxMap,
        layer: &TileLayer,
        priority: Priority,
        tileset: &impl TileSource,
    ) -> Result<(), MapError> {
        let cells = layer.decode(&self.options.decode)?;
        let width = layer.info.width as usize;
        let expected = width * layer.info.height as usize;
        if cells.len() != expected {
            warn!(
                "layer '{}' has {} cells, expected {}x{}",
                layer.name(),
                cells.len(),
                layer.info.width,
                layer.info.height
            );
        }
        if width == 0 {
            if cells.iter().any(|&g| g != 0) {
                return Err(MapError::InvalidTileData(format!(
                    "layer '{}' has tiles but zero width",
                    layer.name()
                )));
            }
            return Ok(());
        }

        let tile = map.tile_size();
        let mut dropped = 0usize;
        for (i, &gid) in cells.iter().enumerate() {
            let Some(index) = TileId(gid).tile_index() else {
                continue;
            };
            let x = (i % width) as u64 * tile.width as u64;
            let y = (i / width) as u64 * tile.height as u64;

            if !canvas.fits(x, y, tile) {
                trace!("cell {i} of '{}' at ({x}, {y}) is off canvas", layer.name());
                dropped += 1;
                continue;
            }

            let block = tileset.get_tile(index, priority)?;
            if block.len() != tile.area() {
                return Err(MapError::Tileset(format!(
                    "tile {index} has {} pixels, map tiles are {tile}",
                    block.len(),
                )));
            }
            canvas.blit(x, y, tile, block);
        }
        if dropped > 0 {
            debug!("layer '{}': {dropped} tiles outside the canvas", layer.name());
        }
        Ok(())
    }
}
