pub mod descriptor;
pub mod extract;
pub mod framework;

pub use descriptor::FunctionDescriptor;
pub use extract::extract;
pub use framework::{detect_framework, Framework};
