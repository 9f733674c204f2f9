//! Platform-neutral primitives shared by the layout engine and its hosts.

pub mod geometry;
