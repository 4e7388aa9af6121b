//! Suite loading from the filesystem

mod yaml;

pub use yaml::load_suite;
