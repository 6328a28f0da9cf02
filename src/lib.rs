//! Prompt-to-image form backed by a remote generation service
//!
//! A single form component holds the prompt being edited and the image
//! reference returned by the backend. The component is headless: event
//! handlers mutate state, and [`view::render`] turns that state into markup.

pub mod app;
pub mod client;
pub mod error;
pub mod form;
pub mod models;
pub mod view;

pub use error::{Error, Result};
