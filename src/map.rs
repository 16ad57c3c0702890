use crate::error::MapError;
use crate::ir_map::{IrMap, IrTileset};
use crate::layer::{Layer, LayerType, ObjectLayer, TileLayer};
use crate::object::Object;
use crate::property::{properties_from_ir, CustomProperty};
use crate::size::Size;
use std::collections::BTreeMap;
use std::fmt;

/// Tileset reference recorded in the map file. Informational only: compositing
/// goes through the tileset image handed to the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetRef {
    /// GID of the tileset's first tile.
    pub first_gid: u32,
    /// External `.tsx`/`.tsj` file, if the tileset is not embedded.
    pub source: Option<String>,
    /// Tileset name.
    pub name: String,
    /// Source image path as written in the map.
    pub image: Option<String>,
    /// Tiles per image row.
    pub columns: u32,
    /// Tiles in the image.
    pub tile_count: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Pixels between tiles in the image.
    pub spacing: u32,
    /// Pixels around the tile grid in the image.
    pub margin: u32,
}

impl From<IrTileset> for TilesetRef {
    fn from(ts: IrTileset) -> Self {
        Self {
            first_gid: ts.first_gid,
            source: ts.source,
            name: ts.name,
            image: ts.image,
            columns: ts.columns,
            tile_count: ts.tile_count,
            tile_width: ts.tile_width,
            tile_height: ts.tile_height,
            spacing: ts.spacing,
            margin: ts.margin,
        }
    }
}

/// Typed, format-independent map. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TmxMap {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Both buckets are always present; each keeps file order.
    layers: BTreeMap<LayerType, Vec<Layer>>,
    /// Tilesets in file order.
    pub tilesets: Vec<TilesetRef>,
    /// Map-level custom properties.
    pub properties: Vec<CustomProperty>,
}

impl TmxMap {
    /// Largest canvas, in pixels, a map may ask for.
    pub const MAX_PIXELS: u64 = 1 << 30;

    /// Builds the map from either loader's output.
    ///
    /// Missing `width`/`height`/`tilewidth`/`tileheight` are `0`; an unknown
    /// layer `type` is an error.
    pub fn from_ir(ir: IrMap) -> Result<Self, MapError> {
        let mut layers = BTreeMap::new();
        layers.insert(LayerType::Tile, Vec::new());
        layers.insert(LayerType::Object, Vec::new());

        for l in ir.layers {
            let layer = Layer::from_ir(l)?;
            layers.entry(layer.layer_type()).or_default().push(layer);
        }

        Ok(Self {
            width: ir.width,
            height: ir.height,
            tile_width: ir.tile_width,
            tile_height: ir.tile_height,
            layers,
            tilesets: ir.tilesets.into_iter().map(TilesetRef::from).collect(),
            properties: properties_from_ir(ir.properties),
        })
    }

    /// Grid extent in tiles.
    pub fn size_in_tiles(&self) -> Size {
        Size::new(self.height, self.width)
    }

    /// Pixel size of one tile.
    pub fn tile_size(&self) -> Size {
        Size::new(self.tile_height, self.tile_width)
    }

    /// Canvas size: `width * tilewidth` by `height * tileheight`.
    ///
    /// Fails with [`MapError::InvalidAttribute`] if an axis overflows `u32`
    /// or the image would exceed [`TmxMap::MAX_PIXELS`].
    pub fn size_in_px(&self) -> Result<Size, MapError> {
        let too_big = |attribute: &str, value: String| MapError::InvalidAttribute {
            element: "map".to_owned(),
            attribute: attribute.to_owned(),
            value,
        };
        let width = self.width.checked_mul(self.tile_width).ok_or_else(|| {
            too_big(
                "width",
                format!("{} (times tilewidth {})", self.width, self.tile_width),
            )
        })?;
        let height = self.height.checked_mul(self.tile_height).ok_or_else(|| {
            too_big(
                "height",
                format!("{} (times tileheight {})", self.height, self.tile_height),
            )
        })?;
        let px = Size::new(height, width);
        if px.checked_area(Self::MAX_PIXELS).is_none() {
            return Err(too_big("width", format!("{} (image of {px} pixels)", self.width)));
        }
        Ok(px)
    }

    /// Layers of one type, in file order.
    pub fn layers(&self, layer_type: LayerType) -> &[Layer] {
        self.layers
            .get(&layer_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tile layers in file order.
    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers(LayerType::Tile).iter().filter_map(Layer::as_tile)
    }

    /// Object layers in file order.
    pub fn object_layers(&self) -> impl Iterator<Item = &ObjectLayer> {
        self.layers(LayerType::Object).iter().filter_map(Layer::as_object)
    }

    /// First layer of `layer_type` called `name`.
    pub fn get_layer_by_name(&self, layer_type: LayerType, name: &str) -> Result<&Layer, MapError> {
        self.layers(layer_type)
            .iter()
            .find(|l| l.name() == name)
            .ok_or_else(|| MapError::LayerNotFound(name.to_owned()))
    }

    /// First object with `id`, searching object layers in file order.
    pub fn get_object_by_id(&self, id: u32) -> Result<&Object, MapError> {
        self.objects()
            .find(|o| o.id == id)
            .ok_or(MapError::ObjectIdNotFound(id))
    }

    /// First object called `name`, searching object layers in file order.
    pub fn get_object_by_name(&self, name: &str) -> Result<&Object, MapError> {
        self.objects()
            .find(|o| o.name == name)
            .ok_or_else(|| MapError::ObjectNameNotFound(name.to_owned()))
    }

    /// Every object of every object layer, in file order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.object_layers().flat_map(ObjectLayer::iter)
    }

    /// Total number of layers across both buckets.
    pub fn layer_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }
}

impl fmt::Display for TmxMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map(w={}, h={}, tw={}, th={}, layers={})",
            self.width,
            self.height,
            self.tile_width,
            self.tile_height,
            self.layer_count()
        )?;
        for layers in self.layers.values() {
            for layer in layers {
                write!(f, "\n -{layer}")?;
            }
        }
        Ok(())
    }
}
