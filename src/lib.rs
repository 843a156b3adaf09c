// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

pub mod bframes;
pub mod combinations;
pub mod error;
pub mod estimates;
pub mod merge;
pub mod naming;
pub mod ordered_map;
pub mod render;
pub mod settings;
pub mod user_config;
pub mod utils;
