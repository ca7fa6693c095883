// Domain layer: identifier and lookup-record models plus the lookup ports.

pub mod model;
pub mod ports;
