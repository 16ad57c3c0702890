// tests/map_tests.rs

use std::cell::RefCell;
use tiled_bake::ir_map::{IrLayer, IrLayerData, IrMap};
use tiled_bake::{
    Canvas, CompositeOptions, Compositor, DecodeOptions, FlipPolicy, LayerNames, MapError,
    MapImageBuilder, Priority, Rgb, Size, TileSource, TmxMap, FLIP_H,
};

/// Tiles of a single color: tile `i` at LO is filled with `i + 1`, at HI with `i + 101`.
struct SolidTiles {
    size: Size,
    lo: Vec<Vec<u8>>,
    hi: Vec<Vec<u8>>,
    lookups: RefCell<Vec<(u32, Priority)>>,
}

impl SolidTiles {
    fn new(size: Size, count: u8) -> Self {
        Self {
            size,
            lo: (0..count).map(|i| vec![i + 1; size.area()]).collect(),
            hi: (0..count).map(|i| vec![i + 101; size.area()]).collect(),
            lookups: RefCell::new(Vec::new()),
        }
    }
}

impl TileSource for SolidTiles {
    fn tile_size(&self) -> Size {
        self.size
    }

    fn get_tile(&self, index: u32, priority: Priority) -> Result<&[u8], MapError> {
        self.lookups.borrow_mut().push((index, priority));
        let tiles = match priority {
            Priority::Lo => &self.lo,
            Priority::Hi => &self.hi,
        };
        tiles
            .get(index as usize)
            .map(Vec::as_slice)
            .ok_or_else(|| MapError::Tileset(format!("no tile {index}")))
    }

    fn palette(&self) -> Vec<Rgb> {
        vec![[0, 0, 0]; 16]
    }
}

fn tile_layer(name: &str, width: u32, height: u32, cells: Vec<u32>) -> IrLayer {
    let mut layer = IrLayer::new("tilelayer");
    layer.name = name.into();
    layer.width = width;
    layer.height = height;
    layer.data = Some(IrLayerData::Cells(cells));
    layer
}

fn map(width: u32, height: u32, tile: u32, layers: Vec<IrLayer>) -> TmxMap {
    TmxMap::from_ir(IrMap {
        width,
        height,
        tile_width: tile,
        tile_height: tile,
        layers,
        ..Default::default()
    })
    .unwrap()
}

/// Pixel rows `[y0, y1)` and columns `[x0, x1)` all equal `value`.
fn block_is(canvas: &Canvas, x0: u32, x1: u32, y0: u32, y1: u32, value: u8) -> bool {
    (y0..y1).all(|y| (x0..x1).all(|x| canvas.get(x, y) == Some(value)))
}

#[test]
fn single_lo_layer_fills_only_non_empty_cells() {
    let map = map(2, 1, 8, vec![tile_layer("LO", 2, 1, vec![1, 0])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 4);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();

    assert_eq!(canvas.size(), Size::new(8, 16));
    assert!(block_is(&canvas, 0, 8, 0, 8, 1));
    assert!(block_is(&canvas, 8, 16, 0, 8, Canvas::BACKGROUND));
    assert_eq!(*tiles.lookups.borrow(), vec![(0, Priority::Lo)]);
}

#[test]
fn later_layer_wins_at_the_same_cell() {
    let map = map(
        2,
        1,
        8,
        vec![
            tile_layer("LO", 2, 1, vec![1, 2]),
            tile_layer("HI", 2, 1, vec![3, 0]),
        ],
    );
    let tiles = SolidTiles::new(Size::new(8, 8), 4);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();

    assert!(block_is(&canvas, 0, 8, 0, 8, 103));
    // HI cell 1 is empty, LO tile stays
    assert!(block_is(&canvas, 8, 16, 0, 8, 2));
}

#[test]
fn stacking_follows_file_order_not_priority() {
    let map = map(
        1,
        1,
        8,
        vec![
            tile_layer("HI", 1, 1, vec![1]),
            tile_layer("LO", 1, 1, vec![2]),
        ],
    );
    let tiles = SolidTiles::new(Size::new(8, 8), 4);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();
    assert!(block_is(&canvas, 0, 8, 0, 8, 2));
}

#[test]
fn unmatched_layers_are_skipped() {
    let map = map(
        1,
        1,
        8,
        vec![
            tile_layer("background", 1, 1, vec![1]),
            tile_layer("lo", 1, 1, vec![1]),
        ],
    );
    let tiles = SolidTiles::new(Size::new(8, 8), 4);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();
    assert!(canvas.pixels().iter().all(|&p| p == Canvas::BACKGROUND));
    assert!(tiles.lookups.borrow().is_empty());
}

#[test]
fn custom_layer_names_select_planes() {
    let map = map(
        1,
        1,
        8,
        vec![
            tile_layer("bg", 1, 1, vec![1]),
            tile_layer("fg", 1, 1, vec![2]),
        ],
    );
    let tiles = SolidTiles::new(Size::new(8, 8), 4);
    let compositor = Compositor::new(CompositeOptions {
        names: LayerNames::new("bg", "fg"),
        ..Default::default()
    });
    compositor.composite(&map, &tiles).unwrap();
    assert_eq!(
        *tiles.lookups.borrow(),
        vec![(0, Priority::Lo), (1, Priority::Hi)]
    );
}

#[test]
fn empty_cells_never_reach_the_tileset() {
    let map = map(3, 3, 8, vec![tile_layer("LO", 3, 3, vec![0; 9])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 1);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();
    assert!(tiles.lookups.borrow().is_empty());
    assert!(canvas.pixels().iter().all(|&p| p == Canvas::BACKGROUND));
}

#[test]
fn tiles_past_the_canvas_are_dropped_silently() {
    // layer is wider than the map: column 2 falls outside the 2x1 canvas,
    // row 1 falls below it
    let map = map(2, 1, 8, vec![tile_layer("LO", 3, 2, vec![1, 1, 1, 1, 1, 1])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 1);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();

    assert_eq!(canvas.size(), Size::new(8, 16));
    assert!(canvas.pixels().iter().all(|&p| p == 1));
}

#[test]
fn canvas_size_comes_from_the_map_not_the_layer() {
    let map = map(4, 2, 8, vec![tile_layer("LO", 1, 1, vec![1])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 1);
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (32, 16));
}

#[test]
fn flipped_cells_follow_the_decode_policy() {
    let map = map(1, 1, 8, vec![tile_layer("LO", 1, 1, vec![FLIP_H | 2])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 4);

    // masked by default: the flag is dropped and tile 1 is drawn unflipped
    let canvas = Compositor::default().composite(&map, &tiles).unwrap();
    assert!(block_is(&canvas, 0, 8, 0, 8, 2));

    let strict = Compositor::new(CompositeOptions {
        decode: DecodeOptions {
            flip_bits: FlipPolicy::Reject,
            ..Default::default()
        },
        ..Default::default()
    });
    assert!(matches!(
        strict.composite(&map, &tiles),
        Err(MapError::FlippedTile { .. })
    ));

    // kept flags do not change which tile is looked up
    let raw = Compositor::new(CompositeOptions {
        decode: DecodeOptions {
            flip_bits: FlipPolicy::Preserve,
            ..Default::default()
        },
        ..Default::default()
    });
    let canvas = raw.composite(&map, &tiles).unwrap();
    assert!(block_is(&canvas, 0, 8, 0, 8, 2));
}

#[test]
fn tileset_errors_propagate() {
    let map = map(1, 1, 8, vec![tile_layer("LO", 1, 1, vec![9])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 1);
    let err = Compositor::default().composite(&map, &tiles).unwrap_err();
    assert!(matches!(err, MapError::Tileset(_)));
}

#[test]
fn tileset_cut_at_another_tile_size_is_rejected() {
    let map = map(1, 1, 8, vec![tile_layer("LO", 1, 1, vec![1])]);
    // same pixel count as an 8x8 tile, different shape
    let tiles = SolidTiles::new(Size::new(4, 16), 1);
    let err = Compositor::default().composite(&map, &tiles).unwrap_err();
    assert!(matches!(err, MapError::Tileset(ref msg) if msg.contains("16x4")));
    assert!(tiles.lookups.borrow().is_empty());
}

#[test]
fn short_tile_block_is_rejected() {
    let map = map(1, 1, 8, vec![tile_layer("LO", 1, 1, vec![1])]);
    let mut tiles = SolidTiles::new(Size::new(8, 8), 1);
    tiles.lo[0].truncate(10);
    let err = Compositor::default().composite(&map, &tiles).unwrap_err();
    assert!(matches!(err, MapError::Tileset(_)));
}

#[test]
fn oversized_map_is_an_error_not_a_panic() {
    let map = TmxMap::from_ir(IrMap {
        width: 70_000,
        height: 1,
        tile_width: 70_000,
        tile_height: 8,
        layers: vec![tile_layer("LO", 1, 1, vec![1])],
        ..Default::default()
    })
    .unwrap();
    let tiles = SolidTiles::new(Size::new(8, 70_000), 1);
    let err = Compositor::default().composite(&map, &tiles).unwrap_err();
    assert!(matches!(err, MapError::InvalidAttribute { .. }));
    assert!(tiles.lookups.borrow().is_empty());
}

#[test]
fn zero_width_layer_with_tiles_is_invalid() {
    let map = map(1, 1, 8, vec![tile_layer("LO", 0, 1, vec![1])]);
    let tiles = SolidTiles::new(Size::new(8, 8), 1);
    let err = Compositor::default().composite(&map, &tiles).unwrap_err();
    assert!(matches!(err, MapError::InvalidTileData(_)));
}

#[test]
fn builder_rebuilds_identical_canvases() {
    let map = map(2, 1, 8, vec![tile_layer("LO", 2, 1, vec![1, 2])]);
    let builder = MapImageBuilder::new(map, SolidTiles::new(Size::new(8, 8), 2), CompositeOptions::default());
    let first = builder.build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(first, second);
    // nothing cached: both builds hit the tileset
    assert_eq!(builder.tileset().lookups.borrow().len(), 4);
}
