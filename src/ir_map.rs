// src/ir_map.rs
//! Canonical, format-agnostic shape both loaders produce.
//!
//! The JSON loader deserializes straight into these structs; the XML loader
//! builds them by hand from the element tree. Optional fields are optional
//! here too, so the entity model can apply its own defaults.

use serde::Deserialize;
use serde_json::Value as JsonValue;

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}
fn string_type() -> String {
    "string".to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IrMap {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(default, rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<IrLayer>,
    #[serde(default)]
    pub tilesets: Vec<IrTileset>,
    #[serde(default)]
    pub properties: Vec<IrProperty>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IrLayer {
    #[serde(rename = "type")]
    pub kind: String, // "tilelayer" | "objectgroup"
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "one")]
    pub opacity: f32,
    #[serde(default)]
    pub offsetx: f32,
    #[serde(default)]
    pub offsety: f32,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub compression: Option<String>,
    #[serde(default)]
    pub data: Option<IrLayerData>,
    #[serde(default)]
    pub objects: Vec<IrObject>,
    #[serde(default)]
    pub properties: Vec<IrProperty>,
}

impl IrLayer {
    /// Empty layer of the given type, used by the XML loader before attributes are applied.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            id: None,
            name: String::new(),
            width: 0,
            height: 0,
            visible: true,
            opacity: 1.0,
            offsetx: 0.0,
            offsety: 0.0,
            encoding: None,
            compression: None,
            data: None,
            objects: Vec::new(),
            properties: Vec::new(),
        }
    }
}

/// Undecoded tile layer payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IrLayerData {
    /// Encoded text (base64, or csv text that has not been split yet).
    Text(String),
    /// Plain cell values (Tiled's uncompressed JSON arrays).
    Cells(Vec<u32>),
    /// Textual cell values: csv tokens or legacy `<tile gid>` attributes.
    Tokens(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IrObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub point: bool,
    #[serde(default)]
    pub ellipse: bool,
    #[serde(default)]
    pub polygon: Vec<IrPoint>,
    #[serde(default)]
    pub polyline: Vec<IrPoint>,
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(default)]
    pub properties: Vec<IrProperty>,
}

impl Default for IrObject {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            kind: String::new(),
            class: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            point: false,
            ellipse: false,
            polygon: Vec::new(),
            polyline: Vec::new(),
            gid: None,
            properties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct IrPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IrProperty {
    pub name: String,
    #[serde(default = "string_type", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: JsonValue,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IrTileset {
    #[serde(default, rename = "firstgid")]
    pub first_gid: u32,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub columns: u32,
    #[serde(default, rename = "tilecount")]
    pub tile_count: u32,
    #[serde(default, rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(default, rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
}
