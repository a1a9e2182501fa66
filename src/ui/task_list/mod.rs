pub mod app;
pub mod controller;
pub mod model;
pub mod surface;
pub mod view;

pub use app::{run, UiOptions};
pub use controller::{Controller, Gesture, Outcome};
pub use surface::{BufferSurface, Surface};
