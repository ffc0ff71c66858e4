//! Shared test harness modules for the `silent-locations` CLI.
#![allow(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
