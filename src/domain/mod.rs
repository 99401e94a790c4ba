// Domain layer: readings and the ports the polling session talks through.

pub mod model;
pub mod ports;
