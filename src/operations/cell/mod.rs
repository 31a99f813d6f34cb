//! Classification of volumetric cells into exporter-ready shapes.

mod assemble;
mod classify;
mod shape;

pub use assemble::CellAssembler;
pub use classify::classify_cell;
pub use shape::{total_word_size, CellExpression, CellShape};
