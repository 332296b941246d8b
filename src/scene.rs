pub(crate) mod export;
pub(crate) mod model;
pub(crate) mod raster;
