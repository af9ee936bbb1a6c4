//! Core library for the TeamUp matchmaking service.
//!
//! The interesting pieces live under [`workflows::matchmaking`]: the
//! applicant status board and the peer review tracker, both reconciling
//! optimistic local state against a remote project directory.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
