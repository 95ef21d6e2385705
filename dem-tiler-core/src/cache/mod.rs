//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod cache;
pub mod filecache;

#[cfg(test)]
mod filecache_test;

pub use self::cache::Cache;
pub use self::filecache::Filecache;
