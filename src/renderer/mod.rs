// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod types;
mod json;
mod plain;

pub use types::*;
pub use plain::plain_renderer;
pub use json::json_renderer;
