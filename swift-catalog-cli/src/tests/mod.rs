//! Shared test harness modules for the catalog CLI.

use super::*;

mod helpers;
