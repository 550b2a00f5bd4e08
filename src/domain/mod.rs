// Domain layer: records, requests and the ports the core drives.

pub mod model;
pub mod ports;
