mod poller;
mod renderer;
mod source;
mod trail;

pub use poller::{Poller, DEFAULT_INTERVAL, MIN_INTERVAL};
pub use renderer::{ConsoleRenderer, Renderer};
pub use source::{FacadeSource, PointSource, SyntheticSource};
pub use trail::{Trail, TRAIL_CAPACITY};
