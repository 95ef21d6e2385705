//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;

mod toolchain;


pub use toolchain::{GdalError, GdalToolchain, FALLBACK_HEIGHT_RANGE, GDAL_REQUIRED};
