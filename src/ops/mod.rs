//! High-level operations.

pub mod load;

pub use load::{
    load_interfaces, load_package, load_package_from_config, load_package_with_config,
};
