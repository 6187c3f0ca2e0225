pub mod configuration;
pub use configuration::{Args, Config};

pub mod error_handling;
pub use error_handling::*;

pub mod storage;
pub use storage::{ActivityStore, DatabaseStorage};

pub mod web_interface;
pub use web_interface::WebServer;
