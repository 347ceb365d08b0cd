//! Audio Probe Adapter - 基于 symphonia 的时长探测

mod symphonia_probe;

pub use symphonia_probe::SymphoniaProbe;
