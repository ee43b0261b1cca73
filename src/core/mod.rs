pub mod clock;
pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod orbit;
pub mod scroll;
pub mod window;

pub use clock::{FpsCounter, FrameClock, FrameInfo};
pub use controller::{Button, Controller, Idle};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use orbit::OrbitControls;
pub use scroll::{ScrollInput, ScrollPage};
pub use window::Viewport;
