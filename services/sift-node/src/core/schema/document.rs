//! Document validation against a closed field set.
//!
//! Numbers are checked through their decimal literal (serde_json is
//! built with `arbitrary_precision`), so integer bounds are exact and
//! never pass through a lossy float conversion.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use super::field::{Field, FieldType};
use crate::core::error::ValidationErrors;

/// Validate `doc` against `fields`, descending into `map` and `slice`
/// children. Every failing path is reported.
pub fn validate_document(
    fields: &BTreeMap<String, Field>,
    doc: &Map<String, Value>,
) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_object(fields, doc, "", &mut errors);
    errors.into_result()
}

fn validate_object(
    fields: &BTreeMap<String, Field>,
    doc: &Map<String, Value>,
    prefix: &str,
    errors: &mut ValidationErrors,
) {
    for (name, field) in fields {
        let path = join(prefix, name);
        match doc.get(name) {
            None if field.required => errors.push(path, "field is required"),
            None => {}
            Some(value) => check_value(field, value, &path, errors),
        }
    }

    for name in doc.keys() {
        if !fields.contains_key(name) {
            errors.push(join(prefix, name), "field is not defined in schema");
        }
    }
}

fn check_value(field: &Field, value: &Value, path: &str, errors: &mut ValidationErrors) {
    let outcome = match (&field.field_type, value) {
        (_, Value::Null) => Ok(()),
        (FieldType::Bool, Value::Bool(_)) => Ok(()),
        (FieldType::Bool, other) => Err(mismatch("bool", other)),
        (FieldType::Keyword | FieldType::Text, Value::String(_)) => Ok(()),
        (FieldType::Keyword | FieldType::Text, other) => Err(mismatch("string", other)),
        (FieldType::Byte, v) => check_integer(v, i8::MIN.into(), i8::MAX.into()),
        (FieldType::Short, v) => check_integer(v, i16::MIN.into(), i16::MAX.into()),
        (FieldType::Integer, v) => check_integer(v, i32::MIN.into(), i32::MAX.into()),
        (FieldType::Long, v) => check_integer(v, i64::MIN.into(), i64::MAX.into()),
        (FieldType::UnsignedLong, v) => check_integer(v, 0, u64::MAX.into()),
        (FieldType::Float, v) => check_float(v, f32::MAX.into()),
        (FieldType::Double, v) => check_float(v, f64::MAX),
        (FieldType::Map, Value::Object(obj)) => {
            validate_object(children(field), obj, path, errors);
            Ok(())
        }
        (FieldType::Map, other) => Err(mismatch("object", other)),
        (FieldType::Slice, Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                match item {
                    Value::Object(obj) => validate_object(children(field), obj, &item_path, errors),
                    other => errors.push(item_path, mismatch("object", other)),
                }
            }
            Ok(())
        }
        (FieldType::Slice, other) => Err(mismatch("array", other)),
        (FieldType::All | FieldType::Other(_), _) => Err(format!(
            "type {:?} cannot hold values",
            field.field_type.as_str()
        )),
    };

    if let Err(message) = outcome {
        errors.push(path, message);
    }
}

fn check_integer(value: &Value, min: i128, max: i128) -> Result<(), String> {
    let literal = number_literal(value, "integer")?;
    match literal.parse::<i128>() {
        Ok(n) if n > max => Err(format!("must be <= {max}")),
        Ok(n) if n < min => Err(format!("must be >= {min}")),
        Ok(_) => Ok(()),
        // Too many digits even for i128: still an integer, just out of range.
        Err(_) if is_integer_literal(&literal) => Err(if literal.starts_with('-') {
            format!("must be >= {min}")
        } else {
            format!("must be <= {max}")
        }),
        Err(_) => Err(format!("cannot parse {literal:?} as integer")),
    }
}

fn check_float(value: &Value, max: f64) -> Result<(), String> {
    let literal = number_literal(value, "float")?;
    let n: f64 = literal
        .parse()
        .map_err(|_| format!("cannot parse {literal:?} as float"))?;
    if n.is_nan() {
        return Err(format!("cannot parse {literal:?} as float"));
    }
    // Literals beyond f64 parse to infinity, which also fails these bounds.
    if n > max {
        Err(format!("must be <= {max:e}"))
    } else if n < -max {
        Err(format!("must be >= {:e}", -max))
    } else {
        Ok(())
    }
}

fn number_literal(value: &Value, expected: &str) -> Result<String, String> {
    match value {
        Value::Number(n) => Ok(literal_text(n)),
        other => Err(mismatch(expected, other)),
    }
}

fn literal_text(n: &Number) -> String {
    n.to_string()
}

fn is_integer_literal(literal: &str) -> bool {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn mismatch(expected: &str, got: &Value) -> String {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("required {expected}, got {kind}")
}

fn children(field: &Field) -> &BTreeMap<String, Field> {
    static NONE: BTreeMap<String, Field> = BTreeMap::new();
    field.children.as_ref().unwrap_or(&NONE)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
