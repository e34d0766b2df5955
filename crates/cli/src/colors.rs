// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for help and status output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use bh_core::{NetworkStatus, Quality};
use clap::builder::styling::Styles;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Default values/context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Healthy connectivity: soft green
    pub const GOOD: u8 = 114;
    /// Degraded connectivity: amber
    pub const POOR: u8 = 179;
    /// No connectivity: muted red
    pub const BAD: u8 = 167;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Format a 256-color ANSI escape sequence for foreground color.
fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

/// ANSI reset sequence.
const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", fg256(code), text, RESET)
    } else {
        text.to_string()
    }
}

fn status_code(status: NetworkStatus) -> u8 {
    match status {
        NetworkStatus::Online => codes::GOOD,
        NetworkStatus::Limited => codes::POOR,
        NetworkStatus::Offline => codes::BAD,
        NetworkStatus::Checking => codes::CONTEXT,
    }
}

fn quality_code(quality: Quality) -> u8 {
    match quality {
        Quality::Good => codes::GOOD,
        Quality::Poor => codes::POOR,
        Quality::Bad => codes::BAD,
        Quality::Unknown => codes::CONTEXT,
    }
}

/// Status name, colored when `enabled`.
pub fn status(status: NetworkStatus, enabled: bool) -> String {
    paint(status_code(status), status.as_str(), enabled)
}

/// Quality name, colored when `enabled`.
pub fn quality(quality: Quality, enabled: bool) -> String {
    paint(quality_code(quality), quality.as_str(), enabled)
}

/// Apply context color (hints, secondary values) to text.
pub fn context(text: &str, enabled: bool) -> String {
    paint(codes::CONTEXT, text, enabled)
}

/// Clap styles for help output.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
