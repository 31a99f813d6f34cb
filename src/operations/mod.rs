pub mod cell;
pub mod orient;
pub mod query;
pub mod surface;
