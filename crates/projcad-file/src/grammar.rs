//! 结构化请求语法
//!
//! 由空白或 `;` 分隔的 `key=value` 赋值组成，`kind=` 指定实体类型：
//!
//! ```text
//! kind=line; true_length=8cm; angle_hp=30deg; angle_vp=45
//! kind=solid type=prism sizes=5,30,80
//! ```
//!
//! 列表用逗号分隔；数值可带单位后缀（`mm`、`cm`、`m`、`in`、`ft`、`deg`、
//! `rad`），统一换算为毫米和度。常用简写会映射到规范属性名。

use crate::error::GrammarError;
use projcad_core::request::{AttributeValue, CanonicalRequest};
use projcad_core::units::Measure;
use std::collections::HashSet;
use tracing::debug;

/// 简写 → 规范属性名
const ALIASES: &[(&str, &str)] = &[
    ("infront", "distance_in_front_of_vp"),
    ("in_front", "distance_in_front_of_vp"),
    ("above", "height_above_hp"),
    ("length", "true_length"),
    ("angle_hp", "angle_to_hp"),
    ("angle_vp", "angle_to_vp"),
    ("surface_angle", "surface_angle_to_hp"),
    ("edge_angle", "edge_angle_to_vp"),
    ("edge_angle_to_vp", "edge_angle_to_vp"),
    ("size", "side_or_diameter"),
    ("side", "side_or_diameter"),
    ("diameter", "side_or_diameter"),
    ("type", "solid_type"),
];

const KIND_KEYS: &[&str] = &["kind", "entity", "entity_kind"];

/// 规范属性名
pub fn canonical_key(key: &str) -> String {
    let key = key.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

fn is_angle_key(key: &str) -> bool {
    key.contains("angle")
}

/// 去掉 `=` 和 `,` 两侧的空白，使每个赋值成为一个词
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            pending_space = true;
            continue;
        }
        if pending_space {
            let glue = matches!(c, '=' | ',')
                || out.ends_with('=')
                || out.ends_with(',')
                || out.is_empty();
            if !glue {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }
    out
}

fn parse_number(key: &str, text: &str) -> Result<f64, GrammarError> {
    let measure = Measure::parse(text).ok_or_else(|| GrammarError::InvalidNumber {
        key: key.to_string(),
        text: text.to_string(),
    })?;
    match (measure, is_angle_key(key)) {
        (Measure::Length(_), true) => Err(GrammarError::UnitMismatch {
            key: key.to_string(),
            text: text.to_string(),
            expected: "an angle",
        }),
        (Measure::Angle(_), false) => Err(GrammarError::UnitMismatch {
            key: key.to_string(),
            text: text.to_string(),
            expected: "a length",
        }),
        (m, _) => Ok(m.value()),
    }
}

fn parse_value(key: &str, text: &str) -> Result<AttributeValue, GrammarError> {
    if text.contains(',') {
        let values = text
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| parse_number(key, s))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(AttributeValue::List(values));
    }
    let starts_numeric = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if starts_numeric {
        parse_number(key, text).map(AttributeValue::Number)
    } else {
        Ok(AttributeValue::Text(text.to_string()))
    }
}

/// 解析一条请求
pub fn parse_request(text: &str) -> Result<CanonicalRequest, GrammarError> {
    let normalized = normalize(text);
    let tokens: Vec<&str> = normalized
        .split(|c: char| c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(GrammarError::Empty);
    }

    let mut kind = None;
    let mut seen = HashSet::new();
    let mut attributes = Vec::new();

    for token in tokens {
        let (key, value) = token
            .split_once('=')
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| GrammarError::MalformedAssignment(token.to_string()))?;
        let key = canonical_key(key);
        if !seen.insert(key.clone()) {
            return Err(GrammarError::DuplicateKey(key));
        }
        if KIND_KEYS.contains(&key.as_str()) {
            kind = Some(value.to_string());
        } else {
            attributes.push((parse_value(&key, value)?, key));
        }
    }

    let kind = kind.ok_or(GrammarError::MissingKind)?;
    let mut request = CanonicalRequest::new(kind.as_str());
    for (value, key) in attributes {
        request.set(&key, value);
    }
    debug!(
        kind = %request.entity_kind,
        attributes = request.attributes.len(),
        "request parsed"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use projcad_core::request::EntityKind;

    #[test]
    fn test_parse_line_with_units_and_aliases() {
        let request =
            parse_request("kind=line; length=8cm; angle_hp=30deg; angle_vp = 45").unwrap();
        assert_eq!(request.entity_kind, EntityKind::Line);
        assert_eq!(request.get("true_length"), Some(&AttributeValue::Number(80.0)));
        assert_eq!(request.get("angle_to_hp"), Some(&AttributeValue::Number(30.0)));
        assert_eq!(request.get("angle_to_vp"), Some(&AttributeValue::Number(45.0)));
    }

    #[test]
    fn test_parse_solid_list() {
        let request = parse_request("kind=solid type=prism sizes=5, 30, 80").unwrap();
        assert_eq!(request.entity_kind, EntityKind::Solid);
        assert_eq!(
            request.get("solid_type"),
            Some(&AttributeValue::Text("prism".to_string()))
        );
        assert_eq!(
            request.get("sizes"),
            Some(&AttributeValue::List(vec![5.0, 30.0, 80.0]))
        );
    }

    #[test]
    fn test_parse_point_aliases() {
        let request = parse_request("kind=point infront=20 above=30").unwrap();
        assert_eq!(
            request.get("distance_in_front_of_vp"),
            Some(&AttributeValue::Number(20.0))
        );
        assert_eq!(request.get("height_above_hp"), Some(&AttributeValue::Number(30.0)));
    }

    #[test]
    fn test_radians_converted() {
        let request = parse_request("kind=lamina surface_angle=0.5rad").unwrap();
        let Some(AttributeValue::Number(deg)) = request.get("surface_angle_to_hp") else {
            panic!("expected number");
        };
        assert!((deg - 28.6479).abs() < 1e-3);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_request("   "), Err(GrammarError::Empty));
        assert_eq!(parse_request("shape=circle"), Err(GrammarError::MissingKind));
        assert_eq!(
            parse_request("kind=line 80"),
            Err(GrammarError::MalformedAssignment("80".to_string()))
        );
        assert_eq!(
            parse_request("kind=line length=80 true_length=60"),
            Err(GrammarError::DuplicateKey("true_length".to_string()))
        );
        assert!(matches!(
            parse_request("kind=line angle_hp=3cm"),
            Err(GrammarError::UnitMismatch { .. })
        ));
        assert!(matches!(
            parse_request("kind=line length=12parsecs"),
            Err(GrammarError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_is_kept() {
        let request = parse_request("kind=helix pitch=5").unwrap();
        assert_eq!(request.entity_kind, EntityKind::Other("helix".to_string()));
    }
}
