use crate::codec::{decode_cells, DecodeOptions};
use crate::error::MapError;
use crate::ir_map::{IrLayer, IrLayerData};
use crate::object::Object;
use crate::property::{properties_from_ir, CustomProperty};
use std::fmt;

/// The two kinds of layer the map model keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerType {
    /// `tilelayer`
    Tile,
    /// `objectgroup`
    Object,
}

impl LayerType {
    /// The `type` string Tiled uses for this kind of layer.
    pub fn tiled_name(self) -> &'static str {
        match self {
            LayerType::Tile => "tilelayer",
            LayerType::Object => "objectgroup",
        }
    }
}

/// Fields every layer has, whatever its type.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInfo {
    /// Layer id, absent in old files.
    pub id: Option<u32>,
    /// Name as written, compared exactly.
    pub name: String,
    /// Width in cells; `0` for object layers.
    pub width: u32,
    /// Height in cells; `0` for object layers.
    pub height: u32,
    /// Hidden layers are still loaded and composited.
    pub visible: bool,
    /// `0.0..=1.0`, informational.
    pub opacity: f32,
    /// Horizontal render offset in pixels.
    pub offset_x: f32,
    /// Vertical render offset in pixels.
    pub offset_y: f32,
    /// Custom properties in file order.
    pub properties: Vec<CustomProperty>,
}

/// A grid of cells referencing tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Common layer fields.
    pub info: LayerInfo,
    /// Payload as found in the file; decoded on demand.
    pub data: Option<IrLayerData>,
    /// `base64`, `csv` or absent.
    pub encoding: Option<String>,
    /// `zlib`, `gzip`, `""` or absent.
    pub compression: Option<String>,
}

impl TileLayer {
    /// Layer name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Cell values in row-major order.
    pub fn decode(&self, options: &DecodeOptions) -> Result<Vec<u32>, MapError> {
        match &self.data {
            Some(data) => decode_cells(
                data,
                self.encoding.as_deref(),
                self.compression.as_deref(),
                options,
            ),
            None => Ok(Vec::new()),
        }
    }
}

/// A group of placed objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLayer {
    /// Common layer fields.
    pub info: LayerInfo,
    /// Objects in file order.
    pub objects: Vec<Object>,
}

impl ObjectLayer {
    /// Layer name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Objects in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.objects.iter()
    }
}

impl<'a> IntoIterator for &'a ObjectLayer {
    type Item = &'a Object;
    type IntoIter = std::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Any layer the map model keeps.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// A `tilelayer`.
    Tile(TileLayer),
    /// An `objectgroup`.
    Object(ObjectLayer),
}

impl Layer {
    /// Builds a layer from the intermediate shape, rejecting unknown `type`s.
    pub fn from_ir(ir: IrLayer) -> Result<Self, MapError> {
        let info = LayerInfo {
            id: ir.id,
            name: ir.name,
            width: ir.width,
            height: ir.height,
            visible: ir.visible,
            opacity: ir.opacity,
            offset_x: ir.offsetx,
            offset_y: ir.offsety,
            properties: properties_from_ir(ir.properties),
        };
        match ir.kind.as_str() {
            "tilelayer" => Ok(Layer::Tile(TileLayer {
                info,
                data: ir.data,
                encoding: ir.encoding,
                compression: ir.compression,
            })),
            "objectgroup" => Ok(Layer::Object(ObjectLayer {
                info,
                objects: ir.objects.into_iter().map(Object::from_ir).collect(),
            })),
            other => Err(MapError::UnsupportedLayerType(other.to_owned())),
        }
    }

    /// Bucket this layer belongs to.
    pub fn layer_type(&self) -> LayerType {
        match self {
            Layer::Tile(_) => LayerType::Tile,
            Layer::Object(_) => LayerType::Object,
        }
    }

    /// Fields shared by both layer kinds.
    pub fn info(&self) -> &LayerInfo {
        match self {
            Layer::Tile(l) => &l.info,
            Layer::Object(l) => &l.info,
        }
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// The tile layer, `None` for an object layer.
    pub fn as_tile(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tile(l) => Some(l),
            Layer::Object(_) => None,
        }
    }

    /// The object layer, `None` for a tile layer.
    pub fn as_object(&self) -> Option<&ObjectLayer> {
        match self {
            Layer::Object(l) => Some(l),
            Layer::Tile(_) => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info();
        write!(
            f,
            "{}(name={:?}, w={}, h={}",
            self.layer_type().tiled_name(),
            info.name,
            info.width,
            info.height
        )?;
        if let Layer::Object(l) = self {
            write!(f, ", objects={}", l.objects.len())?;
        }
        write!(f, ")")
    }
}
