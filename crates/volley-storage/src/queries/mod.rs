// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity.

pub mod api_keys;
pub mod campaigns;
pub mod logs;
pub mod recipients;

/// Parse a TEXT column into a string-backed enum, reporting failures as
/// rusqlite conversion errors so they surface through the normal row path.
pub(crate) fn parse_text_enum<T>(idx: usize, raw: String) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
