// Domain layer: core models and ports (interfaces). No I/O here.

pub mod event_type;
pub mod model;
pub mod ports;
