// Application layer: wiring and the tool-call boundary used by the entry points.

pub mod bootstrap;
pub mod tool;
