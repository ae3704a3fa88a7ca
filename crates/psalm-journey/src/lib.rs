//! # psalm-journey
//!
//! The three-stage journey over a loaded index. One [`Journey`] owns one
//! session; every operation either advances it along
//! `Gates -> Courts -> HolyOfHolies` or fails and leaves it untouched.

pub mod journey;
pub mod reflection;

pub use journey::Journey;
