pub mod case;
pub mod generator;
pub mod materialize;

pub use case::TestCase;
pub use generator::synthesize;
pub use materialize::{assemble, test_file_path, write_test_file};
