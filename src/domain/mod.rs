// Domain layer: core models and ports (interfaces). No storage or CLI dependencies here.

pub mod model;
pub mod ports;
