pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod data;
pub mod export;
pub mod model;
pub mod render;
pub mod search;
pub mod session;
pub mod table;
pub mod utils;

#[cfg(test)]
mod tests;
