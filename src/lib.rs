pub mod dsp; // Pulse synthesis and loop reading
pub mod params; // Linked period/pulse parameters
pub mod player; // Control thread <-> audio thread plumbing

pub use params::{ParamEdit, PwmParams};
