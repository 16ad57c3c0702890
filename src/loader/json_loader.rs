// src/loader/json_loader.rs
use crate::error::MapError;
use crate::ir_map::IrMap;
use std::path::Path;

/// Reads a `.json`/`.tmj` map. The Tiled JSON layout already matches
/// [`IrMap`], so this is a straight deserialize.
pub fn decode_map_file_to_ir(path: &Path) -> Result<IrMap, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::io(path, source))?;
    decode_map_str_to_ir(&txt, path)
}

pub(crate) fn decode_map_str_to_ir(txt: &str, path: &Path) -> Result<IrMap, MapError> {
    serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}
