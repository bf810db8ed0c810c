// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use thiserror::Error;

/// Reasons why a coordinate of a position sample can't be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("coordinate is empty")]
    Empty,

    #[error("coordinate '{0}' is not a number")]
    NotANumber(String),

    #[error("coordinate {0} is not finite")]
    NotFinite(f64),

    #[error("coordinate {0} is out of range")]
    OutOfRange(f64),
}
