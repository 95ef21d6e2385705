//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::grid::{parse_bbox, BoundsError, Extent, ExtentInt, Grid};

#[test]
fn test_tile_extent() {
    let grid = Grid::wgs84();

    let extent000 = grid.tile_extent(0, 0, 0);
    assert_eq!(
        extent000,
        Extent {
            minx: -180.0,
            miny: -90.0,
            maxx: 180.0,
            maxy: 90.0,
        }
    );

    // row 0 is the northernmost row
    let extent = grid.tile_extent(0, 0, 1);
    assert_eq!(
        extent,
        Extent {
            minx: -180.0,
            miny: 0.0,
            maxx: 0.0,
            maxy: 90.0,
        }
    );

    let extent = grid.tile_extent(1, 2, 2);
    assert_eq!(
        extent,
        Extent {
            minx: -90.0,
            miny: -45.0,
            maxx: 0.0,
            maxy: 0.0,
        }
    );

    // out-of-range indices are not clamped and land outside the grid extent
    let extent = grid.tile_extent(4, 0, 2);
    assert_eq!(
        extent,
        Extent {
            minx: 180.0,
            miny: 45.0,
            maxx: 270.0,
            maxy: 90.0,
        }
    );

    assert_eq!(Grid::level_dim(0), 1);
    assert_eq!(Grid::level_dim(8), 256);
}

#[test]
fn test_full_coverage() {
    // tiles of a level cover the extent with shared edges, no gaps, no overlaps
    for grid in &[
        Grid::wgs84(),
        Grid::new(Extent {
            minx: 0.0,
            miny: 0.0,
            maxx: 16.0,
            maxy: 16.0,
        }),
    ] {
        for zoom in 0..=4 {
            let n = Grid::level_dim(zoom);
            for y in 0..n {
                for x in 0..n {
                    let tile = grid.tile_extent(x, y, zoom);
                    assert!(tile.minx < tile.maxx && tile.miny < tile.maxy);
                    if x == 0 {
                        assert_eq!(tile.minx, grid.extent.minx);
                    } else {
                        assert_eq!(tile.minx, grid.tile_extent(x - 1, y, zoom).maxx);
                    }
                    if y == 0 {
                        assert_eq!(tile.maxy, grid.extent.maxy);
                    } else {
                        assert_eq!(tile.maxy, grid.tile_extent(x, y - 1, zoom).miny);
                    }
                    if x == n - 1 {
                        assert_eq!(tile.maxx, grid.extent.maxx);
                    }
                    if y == n - 1 {
                        assert_eq!(tile.miny, grid.extent.miny);
                    }
                }
            }
        }
    }
}

#[test]
fn test_child_tiles() {
    // a tile's extent equals the union of its four children
    let grid = Grid::wgs84();
    for zoom in 0..=3 {
        let n = Grid::level_dim(zoom);
        for y in 0..n {
            for x in 0..n {
                let parent = grid.tile_extent(x, y, zoom);
                let nw = grid.tile_extent(2 * x, 2 * y, zoom + 1);
                let se = grid.tile_extent(2 * x + 1, 2 * y + 1, zoom + 1);
                assert_eq!(parent.minx, nw.minx);
                assert_eq!(parent.maxy, nw.maxy);
                assert_eq!(parent.maxx, se.maxx);
                assert_eq!(parent.miny, se.miny);
                // children share their inner edges
                assert_eq!(nw.maxx, se.minx);
                assert_eq!(nw.miny, se.maxy);
            }
        }
    }
}

#[test]
fn test_tile_limits() {
    let grid = Grid::wgs84();

    // the whole reference extent maps to every tile of a level
    for zoom in 0..=6 {
        let n = Grid::level_dim(zoom);
        assert_eq!(
            grid.tile_limits(zoom, &grid.extent),
            Some(ExtentInt {
                minx: 0,
                miny: 0,
                maxx: n - 1,
                maxy: n - 1,
            })
        );
    }

    // a single tile's extent resolves to exactly that tile,
    // also when the query edges land exactly on grid lines
    let query = grid.tile_extent(5, 2, 3);
    assert_eq!(
        grid.tile_limits(3, &query),
        Some(ExtentInt {
            minx: 5,
            miny: 2,
            maxx: 5,
            maxy: 2,
        })
    );
    let query = Extent {
        minx: 0.0,
        miny: 0.0,
        maxx: 90.0,
        maxy: 45.0,
    };
    assert_eq!(
        grid.tile_limits(2, &query),
        Some(ExtentInt {
            minx: 2,
            miny: 1,
            maxx: 2,
            maxy: 1,
        })
    );

    let query = Extent {
        minx: -10.0,
        miny: -10.0,
        maxx: 10.0,
        maxy: 10.0,
    };
    assert_eq!(
        grid.tile_limits(2, &query),
        Some(ExtentInt {
            minx: 1,
            miny: 1,
            maxx: 2,
            maxy: 2,
        })
    );

    // partial overlap is clipped to the grid
    let query = Extent {
        minx: -200.0,
        miny: 50.0,
        maxx: -170.0,
        maxy: 100.0,
    };
    assert_eq!(
        grid.tile_limits(2, &query),
        Some(ExtentInt {
            minx: 0,
            miny: 0,
            maxx: 0,
            maxy: 0,
        })
    );
}

#[test]
fn test_query_outside_grid() {
    let grid = Grid::wgs84();

    // west of the grid
    let query = Extent {
        minx: -250.0,
        miny: 10.0,
        maxx: -200.0,
        maxy: 20.0,
    };
    for zoom in 0..=4 {
        assert_eq!(grid.tile_limits(zoom, &query), None);
    }

    // north of the grid
    let query = Extent {
        minx: 0.0,
        miny: 91.0,
        maxx: 10.0,
        maxy: 95.0,
    };
    assert_eq!(grid.tile_limits(2, &query), None);

    // outside a sub-globe reference extent
    let grid = Grid::new(Extent {
        minx: 5.0,
        miny: 45.0,
        maxx: 11.0,
        maxy: 48.0,
    });
    let query = Extent {
        minx: -10.0,
        miny: 45.0,
        maxx: 0.0,
        maxy: 48.0,
    };
    assert_eq!(grid.tile_limits(3, &query), None);
}

#[test]
fn test_level_limits() {
    let grid = Grid::wgs84();
    let query = Extent {
        minx: -10.0,
        miny: -10.0,
        maxx: 10.0,
        maxy: 10.0,
    };
    let limits = grid.level_limits(&query, 2);
    assert_eq!(limits.len(), 3);
    assert_eq!(
        limits[0],
        Some(ExtentInt {
            minx: 0,
            miny: 0,
            maxx: 0,
            maxy: 0,
        })
    );
    assert_eq!(
        limits[2],
        Some(ExtentInt {
            minx: 1,
            miny: 1,
            maxx: 2,
            maxy: 2,
        })
    );
}

#[test]
fn test_parse_bbox() {
    assert_eq!(
        parse_bbox("-10,-10,10,10"),
        Ok(Extent {
            minx: -10.0,
            miny: -10.0,
            maxx: 10.0,
            maxy: 10.0,
        })
    );
    // whitespace around fields is accepted
    assert_eq!(
        parse_bbox(" 5.9, 45.8, 10.5, 47.8 "),
        Ok(Extent {
            minx: 5.9,
            miny: 45.8,
            maxx: 10.5,
            maxy: 47.8,
        })
    );
    // out-of-range values are clamped to the globe
    assert_eq!(
        parse_bbox("-200,0,200,10"),
        Ok(Extent {
            minx: -180.0,
            miny: 0.0,
            maxx: 180.0,
            maxy: 10.0,
        })
    );
}

#[test]
fn test_parse_bbox_errors() {
    // wrong field count
    assert_eq!(
        parse_bbox("10,20,30"),
        Err(BoundsError::InvalidFormat("10,20,30".to_string()))
    );
    assert_eq!(
        parse_bbox("10,20,30,40,50"),
        Err(BoundsError::InvalidFormat("10,20,30,40,50".to_string()))
    );
    // non-numeric and non-finite values
    assert!(matches!(
        parse_bbox("a,b,c,d"),
        Err(BoundsError::InvalidFormat(_))
    ));
    assert!(matches!(
        parse_bbox("0,0,NaN,10"),
        Err(BoundsError::InvalidFormat(_))
    ));
    assert!(matches!(
        parse_bbox("0,0,inf,10"),
        Err(BoundsError::InvalidFormat(_))
    ));
    // degenerate before clamping (max_lat <= min_lat)
    assert_eq!(parse_bbox("10,20,30,5"), Err(BoundsError::Empty));
    // degenerate after clamping
    assert_eq!(parse_bbox("-200,-95,-185,-91"), Err(BoundsError::Empty));
}
