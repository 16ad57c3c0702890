// tests/load_tests.rs

use std::fs;
use std::path::Path;
use tiled_bake::{
    encode_cells, load_map, Compression, DecodeOptions, ErrorKind, LayerType, MapError,
    ObjectShape, TmxMap,
};

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

/// The same logical map in Tiled JSON.
fn json_map(payload: &str) -> String {
    format!(
        r#"{{
  "type": "map", "width": 2, "height": 2, "tilewidth": 8, "tileheight": 8,
  "layers": [
    {{"type":"tilelayer","id":1,"name":"LO","width":2,"height":2,
      "encoding":"base64","compression":"zlib","data":"{payload}"}},
    {{"type":"tilelayer","id":2,"name":"HI","width":2,"height":2,
      "encoding":"base64","compression":"zlib","data":"{payload}"}},
    {{"type":"objectgroup","id":3,"name":"entities","objects":[
      {{"id":1,"name":"player","type":"spawn","x":8,"y":16,"width":16,"height":16,
        "properties":[{{"name":"facing","type":"string","value":"left"}}]}},
      {{"id":2,"name":"coin","x":4,"y":4,"point":true}}
    ]}}
  ],
  "tilesets": [{{"firstgid":1,"source":"tiles.tsx"}}]
}}"#
    )
}

/// The same logical map in TMX.
fn tmx_map(payload: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" width="2" height="2" tilewidth="8" tileheight="8">
 <tileset firstgid="1" source="tiles.tsx"/>
 <layer id="1" name="LO" width="2" height="2">
  <data encoding="base64" compression="zlib">{payload}</data>
 </layer>
 <layer id="2" name="HI" width="2" height="2">
  <data encoding="base64" compression="zlib">
   {payload}
  </data>
 </layer>
 <objectgroup id="3" name="entities">
  <object id="1" name="player" type="spawn" x="8" y="16" width="16" height="16">
   <properties>
    <property name="facing" value="left"/>
   </properties>
  </object>
  <object id="2" name="coin" x="4" y="4"><point/></object>
 </objectgroup>
</map>"#
    )
}

fn load_both() -> (TmxMap, TmxMap) {
    let dir = tempfile::tempdir().unwrap();
    let payload = encode_cells(&[1, 0, 0, 2], Compression::Zlib).unwrap();
    let json = write(dir.path(), "level.json", &json_map(&payload));
    let tmx = write(dir.path(), "level.tmx", &tmx_map(&payload));
    (load_map(json).expect("json map"), load_map(tmx).expect("tmx map"))
}

#[test]
fn json_and_tmx_build_the_same_map() {
    let (from_json, from_tmx) = load_both();
    assert_eq!(from_json, from_tmx);
    assert_eq!(from_json.layer_count(), 3);
    assert_eq!(from_json.layers(LayerType::Tile).len(), 2);
    assert_eq!(from_json.layers(LayerType::Object).len(), 1);
}

#[test]
fn both_formats_decode_to_the_same_cells() {
    let (from_json, from_tmx) = load_both();
    let opts = DecodeOptions::default();
    for map in [&from_json, &from_tmx] {
        let cells: Vec<_> = map
            .tile_layers()
            .map(|l| l.decode(&opts).unwrap())
            .collect();
        assert_eq!(cells, vec![vec![1, 0, 0, 2], vec![1, 0, 0, 2]]);
    }
}

#[test]
fn objects_are_found_by_id_and_name() {
    let (map, _) = load_both();
    let player = map.get_object_by_name("player").unwrap();
    assert_eq!(player.id, 1);
    assert_eq!(player.class, "spawn");
    assert_eq!((player.x, player.y), (8.0, 16.0));
    assert_eq!(player.properties[0].kind, "string");
    assert_eq!(map.get_object_by_id(2).unwrap().shape, ObjectShape::Point);
}

#[test]
fn missing_object_id_is_a_lookup_error_naming_the_id() {
    let (map, _) = load_both();
    let err = map.get_object_by_id(404).unwrap_err();
    assert!(matches!(err, MapError::ObjectIdNotFound(404)));
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(err.to_string().contains("404"));
}

#[test]
fn missing_layer_is_a_lookup_error() {
    let (map, _) = load_both();
    assert!(map.get_layer_by_name(LayerType::Tile, "HI").is_ok());
    let err = map.get_layer_by_name(LayerType::Tile, "entities").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn unrecognized_extension_fails_before_reading() {
    // the file does not exist: an Io error would mean we tried to open it
    let err = load_map("does/not/exist/level.tmap").unwrap_err();
    match err {
        MapError::UnsupportedFormat { ref path } => {
            assert_eq!(path, Path::new("does/not/exist/level.tmap"))
        }
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn extension_match_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "LEVEL.TMJ", r#"{"width":3,"height":1,"layers":[]}"#);
    assert_eq!(load_map(path).unwrap().width, 3);
}

#[test]
fn unsupported_layer_type_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "level.json",
        r#"{"layers":[{"type":"imagelayer","name":"sky"}]}"#,
    );
    let err = load_map(path).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedLayerType(ref t) if t == "imagelayer"));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn missing_map_fields_default_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bare.tmx", "<map/>");
    let map = load_map(path).unwrap();
    assert_eq!((map.width, map.height, map.tile_width, map.tile_height), (0, 0, 0, 0));
    assert!(map.layers(LayerType::Tile).is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_map(dir.path().join("nope.tmx")).unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn malformed_documents_are_format_errors() {
    let dir = tempfile::tempdir().unwrap();
    let json = write(dir.path(), "bad.json", "{ \"layers\": [");
    let xml = write(dir.path(), "bad.xml", "<map><layer></map>");
    assert!(matches!(load_map(json).unwrap_err(), MapError::Json { .. }));
    assert!(matches!(load_map(xml).unwrap_err(), MapError::Xml { .. }));
}
