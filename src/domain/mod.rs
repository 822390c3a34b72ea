// Domain layer: core models and ports (interfaces). No process or filesystem mechanics here.

pub mod model;
pub mod ports;
