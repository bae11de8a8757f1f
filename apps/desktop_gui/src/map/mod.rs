//! The application's concrete map provider: a world basemap fetched once per
//! process, painted by an egui surface with an animated camera.

pub mod connector;
pub mod surface;
