pub mod caller;
pub mod database;
pub mod errors;
pub mod logging;
