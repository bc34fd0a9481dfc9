//! Fallback synthesis: a well-formed default when extraction fails.

use serde_json::{Map, Number, Value};

use super::schema::{FieldKind, FieldSpec, SchemaDescriptor};

/// Build a value that satisfies `schema`, starting from a route's declared
/// fallback template.
///
/// Template values that already conform are kept as-is; anything missing or
/// invalid is replaced by a default derived from the field spec. Optional
/// fields absent from the template stay absent. Pure and deterministic.
///
/// The result conforms whenever [`SchemaDescriptor::contradictions`] is
/// empty; a descriptor that nothing satisfies gets a best effort.
pub fn synthesize(schema: &SchemaDescriptor, template: &Value) -> Value {
    let empty = Map::new();
    let template = template.as_object().unwrap_or(&empty);
    let mut out = Map::new();

    if !schema.is_strict() {
        for (key, value) in template {
            if schema.field(key).is_none() {
                out.insert(key.clone(), value.clone());
            }
        }
    }

    for field in schema.fields() {
        match template.get(&field.name) {
            Some(value) if field.accepts(value) => {
                out.insert(field.name.clone(), value.clone());
            }
            Some(value) if !value.is_null() => {
                out.insert(field.name.clone(), default_for(field, Some(value)));
            }
            _ if field.required => {
                out.insert(field.name.clone(), default_for(field, None));
            }
            _ => {}
        }
    }

    Value::Object(out)
}

/// Default for a field, salvaging what it can from an invalid template value.
fn default_for(field: &FieldSpec, template: Option<&Value>) -> Value {
    match field.kind {
        FieldKind::String => default_string(field),
        FieldKind::Number => {
            let n = match field.range {
                Some((min, max)) => 0f64.clamp(min, max.max(min)),
                None => 0.0,
            };
            Number::from_f64(n).map(Value::Number).unwrap_or_else(|| Value::from(0))
        }
        FieldKind::Integer => {
            let n = match field.range {
                Some((min, max)) => 0i64.clamp(min.ceil() as i64, (max.floor() as i64).max(min.ceil() as i64)),
                None => 0,
            };
            Value::from(n)
        }
        FieldKind::Boolean => Value::Bool(false),
        FieldKind::Array => default_array(field, template),
        FieldKind::Object => {
            let nested = field.fields.clone().unwrap_or_default();
            synthesize(&nested, template.unwrap_or(&Value::Null))
        }
        FieldKind::Any => template.cloned().unwrap_or(Value::Null),
    }
}

fn default_string(field: &FieldSpec) -> Value {
    let (min, max) = field.length.unwrap_or((0, usize::MAX));
    if let Some(allowed) = &field.allowed {
        let fitting = allowed.iter().find(|a| (min..=max).contains(&a.chars().count()));
        if let Some(value) = fitting.or(allowed.first()) {
            return Value::String(value.clone());
        }
    }
    Value::String("-".repeat(min))
}

/// Keep the template's conforming items, pad with synthesized items up to
/// the minimum length, and cut to the maximum.
fn default_array(field: &FieldSpec, template: Option<&Value>) -> Value {
    let mut items: Vec<Value> = match (template.and_then(Value::as_array), &field.items) {
        (Some(existing), Some(item)) => existing.iter().filter(|v| item.accepts(v)).cloned().collect(),
        (Some(existing), None) => existing.clone(),
        (None, _) => Vec::new(),
    };

    if let Some((min, max)) = field.length {
        while items.len() < min {
            let filler = match &field.items {
                Some(item) => default_for(item, None),
                None => Value::Null,
            };
            items.push(filler);
        }
        items.truncate(max.max(min));
    }

    Value::Array(items)
}
