pub mod readiness;

pub use readiness::{Readiness, ReadinessProbe};
