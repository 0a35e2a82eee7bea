pub mod acquisition;
pub mod actions;
pub mod camera;
pub mod controller;
pub mod transform;
