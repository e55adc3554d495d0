pub mod console;
pub mod parameters;
