// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use bh_core::OperationType;

use crate::context::Context;
use crate::display::format_outcome;
use crate::error::{Error, Result};

use super::parse_document;

/// Print a document as pretty JSON. Fails with `NotFound` when neither the
/// remote store nor the cache has it.
pub async fn get(ctx: &Context, collection: &str, id: &str, out: &mut impl Write) -> Result<()> {
    ctx.monitor.check_connectivity(true).await;

    match ctx.engine.get(collection, id).await? {
        Some(doc) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            Ok(())
        }
        None => Err(Error::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }),
    }
}

/// Apply a create, update or delete. `document` is required for creates
/// and updates and ignored for deletes.
pub async fn write(
    ctx: &Context,
    kind: OperationType,
    collection: &str,
    id: &str,
    document: Option<&str>,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    // Validate before spending a connectivity check.
    let payload = match (kind, document) {
        (OperationType::Delete, _) => None,
        (_, Some(raw)) => Some(parse_document(raw)?),
        (_, None) => {
            return Err(Error::InvalidJson {
                arg: "document",
                reason: "missing".to_string(),
            })
        }
    };

    ctx.monitor.check_connectivity(true).await;

    let outcome = match (kind, payload) {
        (OperationType::Create, Some(doc)) => ctx.engine.create(collection, id, doc).await?,
        (OperationType::Update, Some(doc)) => ctx.engine.save(collection, id, doc).await?,
        _ => ctx.engine.delete(collection, id).await?,
    };

    writeln!(
        out,
        "{}",
        format_outcome(outcome, kind, collection, id, color)
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "doc_tests.rs"]
mod tests;
