//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::TilesetCfg;
use crate::core::Config;
use dem_grid::{Extent, Grid, MAX_ZOOM};

/// Tile pyramid parameters of one pipeline run
#[derive(Clone, Debug)]
pub struct Tileset {
    /// Bounds to materialize; `None` tiles the full grid extent
    pub extent: Option<Extent>,
    pub zoom_min: u8,
    pub zoom_max: u8,
    pub tile_size: u16,
    pub sample_step: u16,
    pub no_data: f64,
}

pub static WORLD_EXTENT: Extent = Extent {
    minx: -180.0,
    miny: -90.0,
    maxx: 180.0,
    maxy: 90.0,
};

impl Tileset {
    /// Query extent selecting the tiles to materialize
    pub fn query_extent(&self, grid: &Grid) -> Extent {
        self.extent.clone().unwrap_or_else(|| grid.extent.clone())
    }
}

impl<'a> Config<'a, TilesetCfg> for Tileset {
    fn from_config(tileset_cfg: &TilesetCfg) -> Result<Self, String> {
        if tileset_cfg.zoom_min > tileset_cfg.zoom_max {
            return Err(format!(
                "zoom_min {} > zoom_max {}",
                tileset_cfg.zoom_min, tileset_cfg.zoom_max
            ));
        }
        if tileset_cfg.zoom_max > MAX_ZOOM {
            return Err(format!("zoom_max {} > {}", tileset_cfg.zoom_max, MAX_ZOOM));
        }
        if tileset_cfg.tile_size == 0 {
            return Err("tile_size must be positive".to_string());
        }
        let extent = match &tileset_cfg.extent {
            Some(cfg) => {
                let extent = Extent::from(cfg);
                if extent.maxx <= extent.minx || extent.maxy <= extent.miny {
                    return Err(format!("Invalid tileset extent {:?}", extent));
                }
                Some(extent)
            }
            None => None,
        };
        Ok(Tileset {
            extent,
            zoom_min: tileset_cfg.zoom_min,
            zoom_max: tileset_cfg.zoom_max,
            tile_size: tileset_cfg.tile_size,
            sample_step: tileset_cfg.sample_step,
            no_data: tileset_cfg.no_data,
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[tileset]
#extent = { minx = -180.0, miny = -90.0, maxx = 180.0, maxy = 90.0 }
tile_size = 256
zoom_min = 0
zoom_max = 2
sample_step = 4
no_data = -9999.0
"#;
        toml.to_string()
    }
}

pub const TILE_PATH_TEMPLATE: &str = "tiles/{z}/{x}/{y}.bin";

/// Relative tile path within the output directory.
/// Stable and reproducible for a given (z, x, y).
pub fn tile_path(zoom: u8, xtile: u32, ytile: u32) -> String {
    format!("tiles/{}/{}/{}.bin", zoom, xtile, ytile)
}

/// Summary record of a completed tile pyramid
///
/// Assembled once after all tiles of a run exist, then written atomically.
/// The single source of truth for interpreting the pyramid downstream.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct TilesetDescriptor {
    pub version: u32,
    pub tile_size: u16,
    pub zoom_min: u8,
    pub zoom_max: u8,
    pub data_type: String,
    pub tile_path_template: String,
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub no_data: f64,
    pub sample_step: u16,
}

impl TilesetDescriptor {
    /// Assemble the descriptor record. Pure, no I/O.
    pub fn new(tileset: &Tileset, grid: &Grid, min_height: f64, max_height: f64) -> TilesetDescriptor {
        TilesetDescriptor {
            version: 1,
            tile_size: tileset.tile_size,
            zoom_min: tileset.zoom_min,
            zoom_max: tileset.zoom_max,
            data_type: "f32".to_string(),
            tile_path_template: TILE_PATH_TEMPLATE.to_string(),
            min_lon: grid.extent.minx,
            max_lon: grid.extent.maxx,
            min_lat: grid.extent.miny,
            max_lat: grid.extent.maxy,
            min_height,
            max_height,
            no_data: tileset.no_data,
            sample_step: tileset.sample_step,
        }
    }
    /// JSON document written to the metadata path
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap()
    }
}

#[test]
fn test_tileset_from_config() {
    use crate::core::config::TilesetCfg;
    use crate::core::parse_config;

    let toml = r#"
        extent = { minx = 5.9, miny = 45.8, maxx = 10.5, maxy = 47.8 }
        zoom_max = 6
        "#;
    let cfg: TilesetCfg = parse_config(toml.to_string(), "").unwrap();
    let tileset = Tileset::from_config(&cfg).unwrap();
    assert_eq!(tileset.zoom_min, 0);
    assert_eq!(tileset.zoom_max, 6);
    assert_eq!(tileset.tile_size, 256);
    assert_eq!(
        tileset.query_extent(&Grid::wgs84()),
        Extent {
            minx: 5.9,
            miny: 45.8,
            maxx: 10.5,
            maxy: 47.8,
        }
    );

    let toml = r#"
        zoom_min = 3
        zoom_max = 2
        "#;
    let cfg: TilesetCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(
        Tileset::from_config(&cfg).err(),
        Some("zoom_min 3 > zoom_max 2".to_string())
    );

    let toml = r#"
        tile_size = 0
        "#;
    let cfg: TilesetCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(
        Tileset::from_config(&cfg).err(),
        Some("tile_size must be positive".to_string())
    );

    // without an extent the full grid extent is tiled
    let cfg: TilesetCfg = parse_config("".to_string(), "").unwrap();
    let tileset = Tileset::from_config(&cfg).unwrap();
    assert_eq!(tileset.query_extent(&Grid::wgs84()), WORLD_EXTENT);
}

#[test]
fn test_tile_path() {
    assert_eq!(tile_path(0, 0, 0), "tiles/0/0/0.bin");
    assert_eq!(tile_path(12, 1017, 739), "tiles/12/1017/739.bin");
}
