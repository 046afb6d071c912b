#![allow(dead_code)]

pub mod app_env;
pub mod photos;
