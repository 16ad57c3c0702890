// src/loader/xml_loader.rs
use crate::error::MapError;
use crate::ir_map::*;
use roxmltree::{Document, Node};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::str::FromStr;

/// Reads a `.tmx`/`.xml` map into the same shape the JSON loader produces.
pub fn decode_map_file_to_ir(path: &Path) -> Result<IrMap, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::io(path, source))?;
    decode_map_str_to_ir(&txt, path)
}

pub(crate) fn decode_map_str_to_ir(txt: &str, path: &Path) -> Result<IrMap, MapError> {
    let doc = Document::parse(txt).map_err(|source| MapError::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(doc.root_element())
}

/// Parses an optional attribute, naming the element and attribute on failure.
fn attr<T: FromStr>(node: Node, name: &str) -> Result<Option<T>, MapError> {
    match node.attribute(name) {
        None => Ok(None),
        Some(value) => value.trim().parse().map(Some).map_err(|_| MapError::InvalidAttribute {
            element: node.tag_name().name().to_owned(),
            attribute: name.to_owned(),
            value: value.to_owned(),
        }),
    }
}

fn attr_string(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_owned()
}

/// TMX writes booleans as `0`/`1`.
fn attr_flag(node: Node, name: &str, default: bool) -> Result<bool, MapError> {
    Ok(attr::<u8>(node, name)?.map_or(default, |v| v != 0))
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn parse_map(root: Node) -> Result<IrMap, MapError> {
    let mut map = IrMap {
        width: attr(root, "width")?.unwrap_or(0),
        height: attr(root, "height")?.unwrap_or(0),
        tile_width: attr(root, "tilewidth")?.unwrap_or(0),
        tile_height: attr(root, "tileheight")?.unwrap_or(0),
        ..Default::default()
    };

    for child in elements(root) {
        match child.tag_name().name() {
            "layer" => map.layers.push(parse_layer(child, "tilelayer")?),
            "objectgroup" => map.layers.push(parse_layer(child, "objectgroup")?),
            "tileset" => map.tilesets.push(parse_tileset(child)?),
            "properties" => map.properties.extend(parse_properties(child)),
            _ => {}
        }
    }
    Ok(map)
}

fn parse_layer(node: Node, kind: &str) -> Result<IrLayer, MapError> {
    let mut layer = IrLayer::new(kind);
    layer.id = attr(node, "id")?;
    layer.name = attr_string(node, "name");
    layer.width = attr(node, "width")?.unwrap_or(0);
    layer.height = attr(node, "height")?.unwrap_or(0);
    layer.visible = attr_flag(node, "visible", true)?;
    layer.opacity = attr(node, "opacity")?.unwrap_or(1.0);
    layer.offsetx = attr(node, "offsetx")?.unwrap_or(0.0);
    layer.offsety = attr(node, "offsety")?.unwrap_or(0.0);

    for child in elements(node) {
        match child.tag_name().name() {
            "data" => parse_data(child, &mut layer),
            "object" => layer.objects.push(parse_object(child)?),
            "properties" => layer.properties.extend(parse_properties(child)),
            _ => {}
        }
    }
    Ok(layer)
}

fn parse_data(node: Node, layer: &mut IrLayer) {
    layer.encoding = node.attribute("encoding").map(str::to_owned);
    layer.compression = node.attribute("compression").map(str::to_owned);

    let text = node.text().unwrap_or_default().trim();
    layer.data = Some(match layer.encoding.as_deref() {
        Some("csv") => IrLayerData::Tokens(
            text.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        Some(_) => IrLayerData::Text(text.to_owned()),
        // legacy uncompressed form: one <tile gid="..."/> per cell
        None => IrLayerData::Tokens(
            elements(node)
                .filter(|n| n.has_tag_name("tile"))
                .map(|n| n.attribute("gid").unwrap_or("0").to_owned())
                .collect(),
        ),
    });
}

fn parse_object(node: Node) -> Result<IrObject, MapError> {
    let mut obj = IrObject {
        id: attr(node, "id")?.unwrap_or(0),
        name: attr_string(node, "name"),
        kind: attr_string(node, "type"),
        class: attr_string(node, "class"),
        x: attr(node, "x")?.unwrap_or(0.0),
        y: attr(node, "y")?.unwrap_or(0.0),
        width: attr(node, "width")?.unwrap_or(0.0),
        height: attr(node, "height")?.unwrap_or(0.0),
        rotation: attr(node, "rotation")?.unwrap_or(0.0),
        visible: attr_flag(node, "visible", true)?,
        gid: attr(node, "gid")?,
        ..Default::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "point" => obj.point = true,
            "ellipse" => obj.ellipse = true,
            "polygon" => obj.polygon = parse_points(child)?,
            "polyline" => obj.polyline = parse_points(child)?,
            "properties" => obj.properties.extend(parse_properties(child)),
            _ => {}
        }
    }
    Ok(obj)
}

/// `points="0,0 16,0 16,8"`
fn parse_points(node: Node) -> Result<Vec<IrPoint>, MapError> {
    let raw = node.attribute("points").unwrap_or_default();
    raw.split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').unwrap_or((pair, ""));
            match (x.parse(), y.parse()) {
                (Ok(x), Ok(y)) => Ok(IrPoint { x, y }),
                _ => Err(MapError::InvalidAttribute {
                    element: node.tag_name().name().to_owned(),
                    attribute: "points".to_owned(),
                    value: raw.to_owned(),
                }),
            }
        })
        .collect()
}

fn parse_properties(node: Node) -> Vec<IrProperty> {
    elements(node)
        .filter(|n| n.has_tag_name("property"))
        .map(|p| {
            // multi-line strings are stored as element text instead of `value`
            let value = p
                .attribute("value")
                .or_else(|| p.text())
                .unwrap_or_default();
            IrProperty {
                name: attr_string(p, "name"),
                kind: p.attribute("type").unwrap_or("string").to_owned(),
                value: JsonValue::String(value.to_owned()),
            }
        })
        .collect()
}

fn parse_tileset(node: Node) -> Result<IrTileset, MapError> {
    Ok(IrTileset {
        first_gid: attr(node, "firstgid")?.unwrap_or(0),
        source: node.attribute("source").map(str::to_owned),
        name: attr_string(node, "name"),
        image: elements(node)
            .find(|n| n.has_tag_name("image"))
            .and_then(|n| n.attribute("source"))
            .map(str::to_owned),
        columns: attr(node, "columns")?.unwrap_or(0),
        tile_count: attr(node, "tilecount")?.unwrap_or(0),
        tile_width: attr(node, "tilewidth")?.unwrap_or(0),
        tile_height: attr(node, "tileheight")?.unwrap_or(0),
        spacing: attr(node, "spacing")?.unwrap_or(0),
        margin: attr(node, "margin")?.unwrap_or(0),
    })
}
