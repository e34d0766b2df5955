// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod doc;
pub mod queue;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Parse a document argument. Documents must be JSON objects.
pub(crate) fn parse_document(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Error::InvalidJson {
        arg: "document",
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(Error::InvalidJson {
            arg: "document",
            reason: "expected a JSON object".to_string(),
        });
    }
    Ok(value)
}

/// Write `value` as a single line of JSON.
pub(crate) fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(value)?)?;
    Ok(())
}
