// Domain layer: rating math, models and ports. No I/O happens here.

pub mod consensus;
pub mod model;
pub mod ports;
pub mod services;
pub mod tier;
