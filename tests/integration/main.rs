//! Integration tests for Nepali Harvest
//!
//! These tests run the real HTTP fetcher against wiremock servers and write
//! corpus files and state snapshots into temporary directories.

mod crawl_tests;
mod resume_tests;
mod support;
