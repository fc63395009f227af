//! Service layer for dirfetch business logic.
//!
//! This module contains domain logic separated from UI concerns. Services
//! emit events over a channel and leave rendering to the caller.

pub mod download;

pub use download::{
    DownloadConfig, DownloadEvent, DownloadOutcome, DownloadResult, DownloadService, FetchError,
};
