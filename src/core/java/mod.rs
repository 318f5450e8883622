pub mod locator;

pub use locator::{discover_candidates, required_java_major, select_java, AUTO_SENTINEL};
