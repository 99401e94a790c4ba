// Adapters layer: concrete implementations of the domain ports.

pub mod inverter;
pub mod pvoutput;

pub use inverter::AuroraClient;
pub use pvoutput::PvOutputUploader;
