//! Tile layer payload decoding.
//!
//! Tiled stores a layer's cells either as base64 text (optionally zlib or gzip
//! compressed, little-endian `u32` per cell), as comma separated text, as
//! legacy per-tile XML elements, or in JSON as a plain integer array. All of
//! them end up as one `u32` per cell in row-major order, `0` meaning empty.

use crate::error::MapError;
use crate::gid::{TileId, GID_MASK};
use crate::ir_map::IrLayerData;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use std::io::{Read, Write};

/// Compression applied to base64 tile payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain little-endian cells.
    None,
    /// zlib stream (`compression="zlib"`).
    Zlib,
    /// gzip member (`compression="gzip"`).
    Gzip,
}

impl Compression {
    /// Maps a `compression` attribute; `""` is Tiled's spelling of "none".
    pub fn from_tag(tag: &str) -> Result<Self, MapError> {
        match tag {
            "" => Ok(Compression::None),
            "zlib" => Ok(Compression::Zlib),
            "gzip" => Ok(Compression::Gzip),
            other => Err(MapError::InvalidTileData(format!(
                "unsupported compression '{other}'"
            ))),
        }
    }
}

/// What to do with the horizontal/vertical/diagonal flip bits of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipPolicy {
    /// Clear the three flag bits, keeping only the tile reference.
    #[default]
    Mask,
    /// Hand the raw value through untouched.
    Preserve,
    /// Fail on any cell with a flag bit set.
    Reject,
}

/// Knobs for [`decode_cells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Flip flag handling, [`FlipPolicy::Mask`] by default.
    pub flip_bits: FlipPolicy,
    /// Used for base64 payloads that carry no compression tag.
    pub default_compression: Compression,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            flip_bits: FlipPolicy::Mask,
            default_compression: Compression::Zlib,
        }
    }
}

/// Decodes a layer payload into one value per cell.
pub fn decode_cells(
    data: &IrLayerData,
    encoding: Option<&str>,
    compression: Option<&str>,
    options: &DecodeOptions,
) -> Result<Vec<u32>, MapError> {
    let raw = match data {
        IrLayerData::Text(text) => match encoding {
            None | Some("base64") => {
                let compression = match compression {
                    Some(tag) => Compression::from_tag(tag)?,
                    None => options.default_compression,
                };
                decode_base64(text, compression)?
            }
            Some("csv") => parse_tokens(text.split(','))?,
            Some(other) => {
                return Err(MapError::InvalidTileData(format!(
                    "unsupported encoding '{other}'"
                )))
            }
        },
        IrLayerData::Tokens(tokens) => parse_tokens(tokens.iter().map(String::as_str))?,
        IrLayerData::Cells(cells) => cells.clone(),
    };
    apply_flip_policy(raw, options.flip_bits)
}

fn decode_base64(text: &str, compression: Compression) -> Result<Vec<u32>, MapError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let packed = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| MapError::InvalidTileData(format!("bad base64: {e}")))?;

    let bytes = match compression {
        Compression::None => packed,
        Compression::Zlib => inflate(ZlibDecoder::new(&packed[..]), "zlib")?,
        Compression::Gzip => inflate(GzDecoder::new(&packed[..]), "gzip")?,
    };

    if bytes.len() % 4 != 0 {
        return Err(MapError::InvalidTileData(format!(
            "{} bytes is not a whole number of 32-bit cells",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn inflate(mut decoder: impl Read, what: &str) -> Result<Vec<u8>, MapError> {
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| MapError::InvalidTileData(format!("bad {what} stream: {e}")))?;
    Ok(out)
}

fn parse_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Vec<u32>, MapError> {
    tokens
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u32>()
                .map_err(|_| MapError::InvalidTileData(format!("'{t}' is not a tile id")))
        })
        .collect()
}

fn apply_flip_policy(mut cells: Vec<u32>, policy: FlipPolicy) -> Result<Vec<u32>, MapError> {
    match policy {
        FlipPolicy::Preserve => {}
        FlipPolicy::Mask => cells.iter_mut().for_each(|c| *c &= GID_MASK),
        FlipPolicy::Reject => {
            if let Some(&gid) = cells.iter().find(|&&c| TileId(c).is_flipped()) {
                return Err(MapError::FlippedTile { gid });
            }
        }
    }
    Ok(cells)
}

/// Inverse of the base64 path of [`decode_cells`].
pub fn encode_cells(cells: &[u32], compression: Compression) -> Result<String, MapError> {
    let bytes: Vec<u8> = cells.iter().flat_map(|c| c.to_le_bytes()).collect();
    let write_err = |e: std::io::Error| MapError::InvalidTileData(format!("compression failed: {e}"));
    let packed = match compression {
        Compression::None => bytes,
        Compression::Zlib => {
            let mut enc = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            enc.write_all(&bytes).map_err(write_err)?;
            enc.finish().map_err(write_err)?
        }
        Compression::Gzip => {
            let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
            enc.write_all(&bytes).map_err(write_err)?;
            enc.finish().map_err(write_err)?
        }
    };
    Ok(BASE64.encode(packed))
}
