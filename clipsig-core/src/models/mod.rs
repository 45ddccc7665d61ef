pub mod interval;
pub mod range;
pub mod strand;

// re-export for cleaner imports
pub use self::interval::Interval;
pub use self::range::GenomicRange;
pub use self::strand::Strand;
