pub(crate) mod artifact;
pub(crate) mod blur;
pub(crate) mod cpu;
pub(crate) mod placeholder;
pub(crate) mod raster;
pub(crate) mod text;
