// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common Modul for the deviation watch
//!
//! Provides the position samples, the coordinate parse boundary and the
//! clock capability as well as the rendered records that are used across
//! every modul.

pub mod clock;
pub mod error;
pub mod position;
pub mod record;
pub mod test_helper;
