//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Grid iterators

use crate::grid::ExtentInt;

/// Level-by-level iterator
///
/// Levels without tiles (empty limits) are skipped.
pub struct GridIterator {
    z: u8,
    x: u32,
    y: u32,
    maxz: u8,
    limits: Vec<Option<ExtentInt>>,
    finished: bool,
}

impl GridIterator {
    pub fn new(minz: u8, maxz: u8, limits: Vec<Option<ExtentInt>>) -> GridIterator {
        if minz <= maxz && limits.len() > minz as usize {
            let maxz = std::cmp::min(maxz, limits.len() as u8 - 1);
            if let Some(z) = (minz..=maxz).find(|&z| limits[z as usize].is_some()) {
                let limit = limits[z as usize].as_ref().unwrap();
                return GridIterator {
                    z,
                    x: limit.minx,
                    y: limit.miny,
                    maxz,
                    limits,
                    finished: false,
                };
            }
        }
        // "empty" iterator for invalid parameters or all-empty levels
        GridIterator {
            z: 0,
            x: 0,
            y: 0,
            maxz: 0,
            limits: Vec::new(),
            finished: true,
        }
    }
}

impl Iterator for GridIterator {
    /// Current cell index `(z, x, y)`
    type Item = (u8, u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = (self.z, self.x, self.y);
        let limit = self.limits[self.z as usize].as_ref().unwrap();
        if self.y < limit.maxy {
            self.y += 1;
        } else if self.x < limit.maxx {
            self.x += 1;
            self.y = limit.miny;
        } else {
            let next_z = (self.z as usize + 1..=self.maxz as usize)
                .find(|&z| self.limits[z].is_some());
            match next_z {
                Some(z) => {
                    let limit = self.limits[z].as_ref().unwrap();
                    let (minx, miny) = (limit.minx, limit.miny);
                    self.z = z as u8;
                    self.x = minx;
                    self.y = miny;
                }
                None => self.finished = true,
            }
        }
        Some(current)
    }
}

#[test]
fn test_grid_iter() {
    use crate::grid::Grid;
    let grid = Grid::wgs84();
    let limits = grid.level_limits(&grid.extent.clone(), 2);
    let griditer = GridIterator::new(0, 2, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![
            (0, 0, 0),
            (1, 0, 0),
            (1, 0, 1),
            (1, 1, 0),
            (1, 1, 1),
            (2, 0, 0),
            (2, 0, 1),
            (2, 0, 2),
            (2, 0, 3),
            (2, 1, 0),
            (2, 1, 1),
            (2, 1, 2),
            (2, 1, 3),
            (2, 2, 0),
            (2, 2, 1),
            (2, 2, 2),
            (2, 2, 3),
            (2, 3, 0),
            (2, 3, 1),
            (2, 3, 2),
            (2, 3, 3)
        ]
    );

    let limits = grid.level_limits(&grid.extent.clone(), 2);
    let griditer = GridIterator::new(1, 2, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(cells.len(), 4 + 16);
    assert_eq!(cells[0], (1, 0, 0));
    assert_eq!(cells[4], (2, 0, 0));

    let limits = grid.level_limits(&grid.extent.clone(), 0);
    let griditer = GridIterator::new(0, 0, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(cells, vec![(0, 0, 0)]);
}

#[test]
fn test_empty_levels() {
    use crate::grid::{Extent, Grid};
    let grid = Grid::wgs84();
    // query outside the grid: no tiles at any level
    let query = Extent {
        minx: 200.0,
        miny: 10.0,
        maxx: 210.0,
        maxy: 20.0,
    };
    let limits = grid.level_limits(&query, 3);
    assert!(limits.iter().all(|l| l.is_none()));
    let griditer = GridIterator::new(0, 3, limits);
    assert_eq!(griditer.collect::<Vec<_>>(), vec![]);

    // empty levels in between are skipped
    let limits = vec![
        None,
        Some(ExtentInt {
            minx: 0,
            miny: 0,
            maxx: 1,
            maxy: 1,
        }),
        None,
        Some(ExtentInt {
            minx: 2,
            miny: 2,
            maxx: 2,
            maxy: 2,
        }),
    ];
    let griditer = GridIterator::new(0, 3, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![(1, 0, 0), (1, 0, 1), (1, 1, 0), (1, 1, 1), (3, 2, 2)]
    );
}

#[test]
fn test_bad_params() {
    use crate::grid::Grid;
    let grid = Grid::wgs84();

    // missing limits
    let griditer = GridIterator::new(0, 10, Vec::new());
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(cells, vec![]);

    // minz > maxz
    let limits = grid.level_limits(&grid.extent.clone(), 2);
    let griditer = GridIterator::new(3, 2, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(cells, vec![]);

    // maxz >= limits.len()
    let limits = grid.level_limits(&grid.extent.clone(), 1);
    let griditer = GridIterator::new(0, 2, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![(0, 0, 0), (1, 0, 0), (1, 0, 1), (1, 1, 0), (1, 1, 1)]
    );

    // minz >= limits.len()
    let limits = grid.level_limits(&grid.extent.clone(), 0);
    let griditer = GridIterator::new(1, 2, limits);
    let cells = griditer.collect::<Vec<_>>();
    assert_eq!(cells, vec![]);
}
