//! formreader - reads photographed inspection forms into MySQL.
//!
//! A photo uploaded over HTTP is sent to a Google Document AI processor. The
//! entities it finds are normalized into field values, written as one row of
//! the `formularios` table, and echoed back to the uploader.

pub mod cli;
pub mod config;
pub mod extraction;
pub mod repository;
pub mod server;
