#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Examples;
pub mod Utils;
pub mod config;
pub mod graph;
pub mod numerical;
pub mod probability;
pub mod symbolic;
