// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod chains;
mod fixtures;
mod laws;
mod replay;
