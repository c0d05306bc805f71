//! CPU rendering of the panel contents

mod gradient;

pub use gradient::{FrameBuffer, Gradient};
