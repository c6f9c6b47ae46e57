// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the two ledger tables.

pub mod authorized;
pub mod processed;
