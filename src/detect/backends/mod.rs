pub mod seeta;
pub mod stub;

pub use seeta::SeetaBackend;
pub use stub::StubBackend;
