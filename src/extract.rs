// ABOUTME: Request extractors whose rejections render as the diary's error wrapper
// ABOUTME: Malformed bodies and path ids become validation errors instead of plain-text replies

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body. Unparseable or wrong-typed bodies and a missing
/// `Content-Type` are rejected as `AppError::Validation`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Typed path parameters, rejected as `AppError::Validation` when a segment
/// does not parse.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParams<T>(pub T);
