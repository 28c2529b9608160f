//! Route planning server.
//!
//! Answers: "Which ways are there to get from here to there on this date,
//! taking exactly one flight?" Each route is a single flight, optionally
//! preceded and followed by one ground transfer.

pub mod cache;
pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod service;
pub mod web;
