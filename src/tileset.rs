//! The tileset side of compositing: a grid of palette-indexed tiles.

use crate::error::MapError;
use crate::size::Size;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One palette entry.
pub type Rgb = [u8; 3];

/// Bit 7 of an output pixel marks a high-priority tile.
pub const PRIORITY_BIT: u8 = 0x80;

/// Plane a tile is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Pixels unchanged.
    Lo,
    /// Pixels carry [`PRIORITY_BIT`].
    Hi,
}

/// Anything that can hand out tile pixel blocks and a palette.
pub trait TileSource {
    /// Pixel size of one tile.
    fn tile_size(&self) -> Size;

    /// Row-major palette indices of the tile at zero-based `index`.
    fn get_tile(&self, index: u32, priority: Priority) -> Result<&[u8], MapError>;

    /// Colors for the indices returned by [`TileSource::get_tile`].
    fn palette(&self) -> Vec<Rgb>;
}

/// Tileset backed by an indexed PNG.
///
/// Source pixels must use palette indices below 128. High-priority lookups
/// return the same tile with [`PRIORITY_BIT`] set on every pixel, and the
/// palette is mirrored into the upper half so both halves show the same colors.
#[derive(Debug, Clone)]
pub struct IndexedTileset {
    tile_size: Size,
    lo: Vec<Vec<u8>>,
    hi: Vec<Vec<u8>>,
    palette: Vec<Rgb>,
}

impl IndexedTileset {
    /// Reads the PNG at `path`, cut into `tile_size` tiles.
    pub fn open(tile_size: Size, path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MapError::io(path, source))?;
        let tileset = Self::read(tile_size, BufReader::new(file)).map_err(|e| match e {
            MapError::Tileset(msg) => MapError::Tileset(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        debug!(
            "tileset {}: {} tiles of {}",
            path.display(),
            tileset.len(),
            tile_size
        );
        Ok(tileset)
    }

    /// Decodes a PNG stream.
    pub fn read(tile_size: Size, input: impl std::io::Read) -> Result<Self, MapError> {
        if tile_size.is_empty() {
            return Err(MapError::Tileset(format!("invalid tile size {tile_size}")));
        }
        let png_err = |e: png::DecodingError| MapError::Tileset(format!("cannot decode PNG: {e}"));

        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().map_err(png_err)?;

        let info = reader.info();
        if info.color_type != png::ColorType::Indexed {
            return Err(MapError::Tileset(format!(
                "expected an indexed image, found {:?}",
                info.color_type
            )));
        }
        let palette: Vec<Rgb> = info
            .palette
            .as_ref()
            .ok_or_else(|| MapError::Tileset("indexed image has no palette".into()))?
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf).map_err(png_err)?;
        let pixels = unpack_indices(
            &buf[..frame.buffer_size()],
            frame.width as usize,
            frame.height as usize,
            frame.line_size,
            frame.bit_depth as u8,
        );
        Self::from_indices(tile_size, frame.width, frame.height, &pixels, palette)
    }

    /// Cuts tiles out of an already decoded index buffer.
    pub fn from_indices(
        tile_size: Size,
        image_width: u32,
        image_height: u32,
        pixels: &[u8],
        palette: Vec<Rgb>,
    ) -> Result<Self, MapError> {
        if tile_size.is_empty() {
            return Err(MapError::Tileset(format!("invalid tile size {tile_size}")));
        }
        if pixels.len() < image_width as usize * image_height as usize {
            return Err(MapError::Tileset(format!(
                "{} pixels do not cover a {image_width}x{image_height} image",
                pixels.len()
            )));
        }
        if let Some(&bad) = pixels.iter().find(|&&p| p & PRIORITY_BIT != 0) {
            return Err(MapError::Tileset(format!(
                "pixel index {bad} uses bit 7, which is reserved for tile priority"
            )));
        }

        let (tw, th) = (tile_size.width as usize, tile_size.height as usize);
        let stride = image_width as usize;
        let cols = stride / tw;
        let rows = image_height as usize / th;

        let mut lo = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let mut tile = Vec::with_capacity(tw * th);
                for y in 0..th {
                    let start = (row * th + y) * stride + col * tw;
                    tile.extend_from_slice(&pixels[start..start + tw]);
                }
                lo.push(tile);
            }
        }
        let hi = lo
            .iter()
            .map(|t| t.iter().map(|p| p | PRIORITY_BIT).collect())
            .collect();

        Ok(Self {
            tile_size,
            lo,
            hi,
            palette,
        })
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.lo.len()
    }

    /// True if the image is smaller than one tile.
    pub fn is_empty(&self) -> bool {
        self.lo.is_empty()
    }
}

impl TileSource for IndexedTileset {
    fn tile_size(&self) -> Size {
        self.tile_size
    }

    fn get_tile(&self, index: u32, priority: Priority) -> Result<&[u8], MapError> {
        let tiles = match priority {
            Priority::Lo => &self.lo,
            Priority::Hi => &self.hi,
        };
        tiles.get(index as usize).map(Vec::as_slice).ok_or_else(|| {
            MapError::Tileset(format!(
                "tile index {index} out of range, tileset has {} tiles",
                tiles.len()
            ))
        })
    }

    fn palette(&self) -> Vec<Rgb> {
        let half = usize::from(PRIORITY_BIT);
        let mut pal: Vec<Rgb> = self.palette.iter().take(half).copied().collect();
        pal.resize(half, [0, 0, 0]);
        pal.extend_from_within(..);
        pal
    }
}

/// Expands 1/2/4/8-bit packed rows to one index per byte.
fn unpack_indices(data: &[u8], width: usize, height: usize, line_size: usize, depth: u8) -> Vec<u8> {
    if depth == 8 {
        return data
            .chunks(line_size)
            .take(height)
            .flat_map(|row| row[..width].iter().copied())
            .collect();
    }
    let per_byte = 8 / depth as usize;
    let mask = (1u8 << depth) - 1;
    let mut out = Vec::with_capacity(width * height);
    for row in data.chunks(line_size).take(height) {
        for x in 0..width {
            let shift = 8 - depth as usize * (x % per_byte + 1);
            out.push((row[x / per_byte] >> shift) & mask);
        }
    }
    out
}
