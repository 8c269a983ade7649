//! # reyes
//!
//! [Rust][rust] crate implementing the quadric dicing and adaptive
//! subdivision core of a [REYES][reyes] style micropolygon renderer.
//!
//! A primitive is asked for its bound first (for culling), then
//! whether it is diceable (which estimates the grid size in raster
//! space). Diceable primitives get diced into a grid of shadable
//! vertices, the others get split into two children which go through
//! the same pipeline again.
//!
//! The main loop, which drives many primitives through worker
//! threads, can be found [here].
//!
//! [rust]: https://www.rust-lang.org
//! [reyes]: https://graphics.pixar.com/library/Reyes/
//! [here]: core/render/fn.dice_scene.html

#[macro_use]
extern crate impl_ops;

pub mod core;
pub mod shapes;
pub mod workqueue;
