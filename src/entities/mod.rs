mod coordinates;
mod isochrone;

pub use coordinates::Coordinates;
pub use isochrone::{IsochroneRecord, NewIsochrone};
