pub mod machine_image;
pub mod virtual_machine;

pub use machine_image::*;
pub use virtual_machine::*;
