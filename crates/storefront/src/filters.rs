//! Askama filters used by `layout.html`.
//!
//! Both ignore their input; they exist so the layout can pull values that
//! are not part of any page context.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Year shown in the footer copyright line.
///
/// Usage in templates: `&copy; {{ ""|current_year }} Techshop`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Fingerprint of `static/css/main.css`, set by `build.rs` as `CSS_HASH`.
///
/// Empty when the build could not hash the stylesheet.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}
