// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod lines;

pub use lines::{open, Input};
