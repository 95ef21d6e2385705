//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{parse_config, read_config, ApplicationCfg, DEFAULT_CONFIG};

#[test]
fn test_load_config() {
    let config = read_config("../dem-tiler-service/src/test/example.toml");
    println!("{:#?}", config);
    let config: ApplicationCfg = config.expect("load_config returned Err");
    assert_eq!(config.pipeline.input, "data/terrain/raw");
    assert_eq!(config.pipeline.output, "data/terrain");
    assert_eq!(config.grid.predefined, Some("wgs84".to_string()));
    assert_eq!(config.tileset.tile_size, 256);
    assert_eq!(config.tileset.zoom_min, 0);
    assert_eq!(config.tileset.zoom_max, 2);
    assert_eq!(config.tileset.sample_step, 4);
    assert_eq!(config.tileset.no_data, -9999.0);
    let extent = config.tileset.extent.expect("tileset extent missing");
    assert_eq!(extent.minx, 5.9);
    assert_eq!(extent.maxy, 47.8);
}

#[test]
fn test_default_config() {
    let config: ApplicationCfg =
        parse_config(DEFAULT_CONFIG.to_string(), "").expect("parse_config returned Err");
    assert_eq!(config.pipeline.input, "data/terrain/raw");
    assert_eq!(config.grid.predefined, Some("wgs84".to_string()));
    assert!(config.tileset.extent.is_none());
    assert_eq!(config.tileset.zoom_max, 2);
}

#[test]
fn test_config_defaults() {
    // tileset entries fall back to the pipeline defaults
    let toml = r#"
        [pipeline]
        input = "dem"
        output = "out"

        [grid]
        predefined = "wgs84"

        [tileset]
        zoom_max = 4
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(config.tileset.tile_size, 256);
    assert_eq!(config.tileset.zoom_min, 0);
    assert_eq!(config.tileset.zoom_max, 4);
    assert_eq!(config.tileset.sample_step, 4);
    assert_eq!(config.tileset.no_data, -9999.0);
}

#[test]
fn test_parse_error() {
    let config: Result<ApplicationCfg, _> = read_config("src/core/mod.rs");
    assert_eq!(
        "src/core/mod.rs - unexpected character found: `/` at line 1",
        config.err().unwrap()
    );

    let config: Result<ApplicationCfg, _> = read_config("wrongfile");
    assert_eq!("Could not find config file!", config.err().unwrap());
}

#[test]
fn test_envvar_syntax() {
    let toml = r#"
        [pipeline]
        input = "${INPUT_DIR}"
        output = "out"
        "#;
    let config: Result<ApplicationCfg, _> = parse_config(toml.to_string(), "");
    assert_eq!(
        "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`",
        config.err().unwrap()
    );
}
