//! On-disk state: settings, layout and string-keyed local storage

pub mod layout;
pub mod local;
pub mod settings;
