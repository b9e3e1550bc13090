//! Terminal input and output seams. The shell only talks to these traits, so
//! tests can drive it with scripted events and a `TestBackend`.

pub mod console;
mod input_driver;
mod output_driver;

pub use input_driver::InputDriver;
pub use output_driver::OutputDriver;
