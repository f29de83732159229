pub mod async_task;
pub mod cloud_interface;
pub mod data_transfer_objects;
pub mod providers;

pub use async_task::{AsyncTask, ProgressReporter};
pub use cloud_interface::*;
