pub mod app;
pub mod catalog;
pub mod config;
pub mod control;
pub mod domain;
pub mod error;
pub mod format;
pub mod fs_util;
pub mod manifest;
pub mod output;
pub mod payload;
pub mod reader;
pub mod reconcile;
pub mod store;
pub mod visibility;
pub mod writer;
