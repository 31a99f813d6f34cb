mod area;
mod volume;

pub use area::SurfaceArea;
pub use volume::{face_volume_term, CellVolume, GridVolume, SignedVolume};

pub(crate) use volume::planned_signed_volume;
