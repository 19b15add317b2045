// Re-export glam for convenience
pub use glam::*;

// Orrery math types
mod camera;
mod ray;
pub use camera::CameraState;
pub use ray::Ray;
