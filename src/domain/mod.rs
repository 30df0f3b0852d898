// Domain layer: canonical models, lookup tables and ports (interfaces).

pub mod collections;
pub mod locale;
pub mod model;
pub mod ports;
