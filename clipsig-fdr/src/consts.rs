pub const DEFAULT_SPREAD: u32 = 15;
pub const DEFAULT_RANDOMISATIONS: u32 = 100;
pub const DEFAULT_THRESHOLD: f64 = 0.05;
