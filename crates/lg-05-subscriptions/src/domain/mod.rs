//! # Domain Layer

pub mod app_call;

pub use app_call::{AppCallKind, NOTE_PREFIX};
