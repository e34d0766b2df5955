// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn status(code: u16) -> RemoteError {
    RemoteError::Status {
        status: code,
        body: String::new(),
    }
}

#[parameterized(
    network = { RemoteError::Network("refused".into()), Category::Network, true },
    unauthorized = { status(401), Category::Authentication, false },
    forbidden = { status(403), Category::Authorization, false },
    bad_request = { status(400), Category::DataValidation, false },
    conflict = { status(409), Category::DataValidation, false },
    not_found = { status(404), Category::Api, false },
    timeout = { status(408), Category::Api, true },
    throttled = { status(429), Category::Api, true },
    unavailable = { status(503), Category::Api, true },
    decode = { RemoteError::Decode("eof".into()), Category::Api, false },
    unsupported = { RemoteError::NotSupported("create".into()), Category::Api, false },
)]
fn category_and_retryability(error: RemoteError, category: Category, retryable: bool) {
    assert_eq!(error.category(), category);
    assert_eq!(error.is_retryable(), retryable);
    assert_eq!(Failure::category(&error), Some(category));
}

#[test]
fn display_includes_status_and_body() {
    let error = RemoteError::Status {
        status: 500,
        body: "boom".to_string(),
    };
    assert_eq!(error.to_string(), "remote returned status 500: boom");
}
