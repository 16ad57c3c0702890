use crate::compositor::Canvas;
use crate::error::MapError;
use crate::tileset::Rgb;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Largest palette an 8-bit indexed image can carry.
pub const MAX_PALETTE_LEN: usize = 256;

/// A composited canvas paired with the palette its indices refer to.
#[derive(Debug, Clone)]
pub struct IndexedImage {
    canvas: Canvas,
    palette: Vec<Rgb>,
}

impl IndexedImage {
    /// Fails with [`MapError::InvalidPalette`] past [`MAX_PALETTE_LEN`] entries.
    pub fn new(canvas: Canvas, palette: Vec<Rgb>) -> Result<Self, MapError> {
        if palette.len() > MAX_PALETTE_LEN {
            return Err(MapError::InvalidPalette(palette.len()));
        }
        Ok(Self { canvas, palette })
    }

    /// Pixel indices.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Colors for the pixel indices.
    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Writes an 8-bit indexed PNG, unfiltered and with the fastest deflate setting.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| MapError::io(path, source))?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out).map_err(|source| MapError::Export {
            path: path.to_path_buf(),
            source,
        })?;
        out.flush().map_err(|source| MapError::io(path, source))?;
        info!(
            "wrote {} ({}, {} colors)",
            path.display(),
            self.canvas.size(),
            self.palette.len()
        );
        Ok(())
    }

    /// Encodes the PNG into any writer.
    pub fn write_to<W: Write>(&self, w: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(w, self.canvas.width(), self.canvas.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(self.palette.concat());
        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.canvas.pixels())?;
        writer.finish()
    }
}
