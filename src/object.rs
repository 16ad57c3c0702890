use crate::ir_map::IrObject;
use crate::property::{properties_from_ir, CustomProperty};

/// Polygon/polyline vertex, relative to the object position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

/// Geometry of an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// Default when no other shape is given.
    Rectangle,
    /// Ellipse inscribed in the object bounds.
    Ellipse,
    /// Zero-size marker.
    Point,
    /// Closed outline.
    Polygon(Vec<Point>),
    /// Open outline.
    Polyline(Vec<Point>),
    /// Tile object.
    Tile {
        /// Raw GID including flip flags.
        gid: u32,
    },
}

/// A placed entity from an object layer. Carried through, never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Unique within the map.
    pub id: u32,
    /// Possibly empty, not unique.
    pub name: String,
    /// `class` (Tiled >= 1.9) or the older `type` field.
    pub class: String,
    /// Position in pixels.
    pub x: f32,
    /// Position in pixels.
    pub y: f32,
    /// Width in pixels, `0` for points.
    pub width: f32,
    /// Height in pixels, `0` for points.
    pub height: f32,
    /// Clockwise, in degrees.
    pub rotation: f32,
    /// Editor visibility flag.
    pub visible: bool,
    /// Geometry.
    pub shape: ObjectShape,
    /// Custom properties in file order.
    pub properties: Vec<CustomProperty>,
}

impl Object {
    /// Converts the intermediate shape; `gid` wins over point/ellipse/polygon/polyline.
    pub fn from_ir(obj: IrObject) -> Self {
        let points = |pts: Vec<crate::ir_map::IrPoint>| {
            pts.into_iter().map(|p| Point { x: p.x, y: p.y }).collect::<Vec<_>>()
        };
        let shape = if let Some(gid) = obj.gid {
            ObjectShape::Tile { gid }
        } else if obj.point {
            ObjectShape::Point
        } else if obj.ellipse {
            ObjectShape::Ellipse
        } else if !obj.polygon.is_empty() {
            ObjectShape::Polygon(points(obj.polygon))
        } else if !obj.polyline.is_empty() {
            ObjectShape::Polyline(points(obj.polyline))
        } else {
            ObjectShape::Rectangle
        };

        let class = if !obj.class.is_empty() {
            obj.class
        } else {
            obj.kind
        };

        Self {
            id: obj.id,
            name: obj.name,
            class,
            x: obj.x,
            y: obj.y,
            width: obj.width,
            height: obj.height,
            rotation: obj.rotation,
            visible: obj.visible,
            shape,
            properties: properties_from_ir(obj.properties),
        }
    }
}
