pub mod model;
pub mod store;

pub use model::{InstanceConfig, InstancePaths, LoaderKind};
pub use store::InstanceStore;
