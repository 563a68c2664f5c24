//! Shared test harness modules for the campusmap CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use build::{BuildSettings, execute_build, parse_override, settings_from_layers_for_test};

mod unit;
