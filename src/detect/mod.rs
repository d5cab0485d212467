mod backend;
mod backends;
mod result;

pub use backend::{DetectorParams, FaceDetector};
pub use backends::{SeetaBackend, StubBackend};
pub use result::FaceBox;
