//! Domain layer: the validated configuration and the values it carries.

pub mod models;
