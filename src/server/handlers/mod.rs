pub mod isochrones;
