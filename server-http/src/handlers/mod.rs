pub mod roles;
pub mod system;

pub use roles::{data, front, rate, service, use_post};
pub use system::{healthz, readinez, version};
