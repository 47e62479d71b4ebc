// Domain layer: serving configuration, manifest value objects and the ports the generator depends on.

pub mod model;
pub mod ports;
