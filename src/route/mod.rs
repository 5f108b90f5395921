//! The console route tree and the function that resolves a path against it.

pub mod matcher;
pub mod node;
pub mod table;

pub use matcher::{RouteMatch, resolve};
pub use node::{Element, RouteNode, Segment};
pub use table::RouteTable;
