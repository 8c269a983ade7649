//! The core of the dicing engine: geometry, transformations, the
//! render context and its attributes, grids, micropolygons and the
//! primitive pipeline (bound, diceable, dice, split).
//!
//! - [reyes](reyes/index.html)
//! - [geometry](geometry/index.html)
//! - [transform](transform/index.html)
//! - [paramset](paramset/index.html)
//! - [parameters](parameters/index.html)
//! - [context](context/index.html)
//! - [shape](shape/index.html)
//! - [primitive](primitive/index.html)
//! - [grid](grid/index.html)
//! - [micropolygon](micropolygon/index.html)
//! - [bucket](bucket/index.html)
//! - [render](render/index.html)

pub mod bucket;
pub mod context;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod kdtree;
pub mod micropolygon;
pub mod parameters;
pub mod paramset;
pub mod primitive;
pub mod render;
pub mod reyes;
pub mod rng;
pub mod shape;
pub mod spectrum;
pub mod stats;
pub mod transform;
