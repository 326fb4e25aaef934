//! routelink core - program model and descriptor definitions
//!
//! The program model describes what the host compiler declared; the
//! descriptor model is the normalized tree discovery builds from it and
//! the emitter renders.

pub mod descriptor;
pub mod model;
pub mod template;

pub use descriptor::*;
pub use model::*;
pub use template::*;
