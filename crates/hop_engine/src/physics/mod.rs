//! Physics module for collision detection primitives
//!
//! Brute-force, per-pair tests only: world-space axis-aligned boxes built
//! from a node's local box and its world matrix, interval overlap on each
//! axis, and a damped positional separation offset. There is no broad-phase
//! structure and no velocity response.

pub mod aabb;

pub use aabb::{AABB, intervals_overlap};
