//! Numeric vs. categorical feature classification

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::Serialize;

use super::error::{WoeError, WoeResult};

/// How a feature is binned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKind::Numeric => write!(f, "numeric"),
            FeatureKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Feature values extracted from a column, one entry per row
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValues {
    /// `None` marks a missing value (null or NaN)
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl FeatureValues {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValues::Numeric(_) => FeatureKind::Numeric,
            FeatureValues::Categorical(_) => FeatureKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FeatureValues::Numeric(v) => v.len(),
            FeatureValues::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct non-missing values
    pub fn distinct_count(&self) -> usize {
        match self {
            FeatureValues::Numeric(values) => {
                let mut present: Vec<f64> = values.iter().flatten().copied().collect();
                present.sort_by(|a, b| a.total_cmp(b));
                present.dedup();
                present.len()
            }
            FeatureValues::Categorical(values) => {
                values.iter().flatten().collect::<BTreeSet<_>>().len()
            }
        }
    }
}

/// Whether a single value reads as a number: a float literal or a
/// single Unicode numeral with a known value.
///
/// Numeral characters without a known value (`Ⅼ`, `𝟘`) read as text, so a
/// numeric classification always converts.
pub fn is_numeric_value(s: &str) -> bool {
    parse_numeral(s).is_some()
}

/// Decide numeric vs. categorical from the distinct non-missing values.
///
/// An empty set is numeric: there is nothing to contradict it.
pub fn classify_values<'a, I>(distinct: I) -> FeatureKind
where
    I: IntoIterator<Item = &'a str>,
{
    if distinct.into_iter().all(is_numeric_value) {
        FeatureKind::Numeric
    } else {
        FeatureKind::Categorical
    }
}

/// Convert a numeral to f64.
///
/// Float literals parse directly. Single characters cover ASCII, fullwidth,
/// superscript, subscript and circled digits, common vulgar fractions, CJK
/// numerals and Roman numerals one to twelve.
pub fn parse_numeral(s: &str) -> Option<f64> {
    if let Ok(v) = s.trim().parse::<f64>() {
        return Some(v);
    }
    let mut chars = s.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return None,
    };
    if let Some(d) = c.to_digit(10) {
        return Some(d as f64);
    }
    let code = c as u32;
    let offset = |first: u32| (code - first) as f64;
    let value = match c {
        '\u{FF10}'..='\u{FF19}' => offset(0xFF10),
        '\u{2080}'..='\u{2089}' => offset(0x2080),
        '\u{2074}'..='\u{2079}' => offset(0x2070),
        '\u{2070}' => 0.0,
        '¹' => 1.0,
        '²' => 2.0,
        '³' => 3.0,
        // ① to ⑳
        '\u{2460}'..='\u{2473}' => offset(0x2460) + 1.0,
        // Ⅰ to Ⅻ, ⅰ to ⅻ
        '\u{2160}'..='\u{216B}' => offset(0x2160) + 1.0,
        '\u{2170}'..='\u{217B}' => offset(0x2170) + 1.0,
        '¼' => 0.25,
        '½' => 0.5,
        '¾' => 0.75,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '⅕' => 0.2,
        '⅛' => 0.125,
        '〇' | '零' => 0.0,
        '一' => 1.0,
        '二' => 2.0,
        '三' => 3.0,
        '四' => 4.0,
        '五' => 5.0,
        '六' => 6.0,
        '七' => 7.0,
        '八' => 8.0,
        '九' => 9.0,
        '十' => 10.0,
        '百' => 100.0,
        '千' => 1000.0,
        '万' => 10000.0,
        _ => return None,
    };
    Some(value)
}

/// Extract a feature column as numeric or categorical values.
///
/// Numeric and boolean dtypes are numeric without inspection. Every other
/// dtype is read as strings and classified from its distinct values;
/// categorical features over `max_categories` distinct values are rejected.
pub fn extract_feature_values(column: &Column, max_categories: usize) -> WoeResult<FeatureValues> {
    let name = column.name().to_string();
    let dtype = column.dtype();

    if dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean) {
        let float_col = column.cast(&DataType::Float64)?;
        let values = float_col
            .f64()?
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        return Ok(FeatureValues::Numeric(values));
    }

    let string_col = column.cast(&DataType::String)?;
    let raw: Vec<Option<String>> = string_col
        .str()?
        .iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();

    let distinct: BTreeSet<&str> = raw.iter().flatten().map(|s| s.as_str()).collect();

    match classify_values(distinct.iter().copied()) {
        FeatureKind::Numeric => {
            let mut values = Vec::with_capacity(raw.len());
            for v in &raw {
                match v {
                    Some(s) => {
                        let parsed = parse_numeral(s).ok_or_else(|| WoeError::UnconvertibleNumeral {
                            feature: name.clone(),
                            value: s.clone(),
                        })?;
                        values.push(Some(parsed).filter(|x: &f64| !x.is_nan()));
                    }
                    None => values.push(None),
                }
            }
            Ok(FeatureValues::Numeric(values))
        }
        FeatureKind::Categorical => {
            if distinct.len() > max_categories {
                return Err(WoeError::TooManyCategories {
                    feature: name,
                    count: distinct.len(),
                    limit: max_categories,
                });
            }
            Ok(FeatureValues::Categorical(raw))
        }
    }
}
