use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use regex::RegexBuilder;
use std::cmp::Ordering;

/// Evaluates a query document against `document`.
///
/// Top-level keys are field paths (dotted paths walk embedded documents)
/// or the logical operators `$and`, `$or` and `$nor`. A field condition is
/// either a literal, matched by equality, or an operator document such as
/// `{"$gt": 5, "$lt": 10}`. An array field matches when the array itself or
/// any of its elements satisfies the condition.
pub(crate) fn matches(document: &Document, filter: &Document) -> FacadeResult<bool> {
    for (key, condition) in filter.iter() {
        let matched = match key.as_str() {
            "$and" => all_match(document, condition)?,
            "$or" => any_match(document, condition)?,
            "$nor" => !any_match(document, condition)?,
            op if op.starts_with('$') => {
                log::error!("Unknown top level query operator {}", op);
                return Err(FacadeError::new(
                    &format!("unknown top level operator: {}", op),
                    ErrorKind::InvalidOperation,
                ));
            }
            field => field_matches(document.get_value(field), condition)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn sub_filters(condition: &Value) -> FacadeResult<Vec<&Document>> {
    let clauses = condition.as_array().ok_or_else(|| {
        FacadeError::new("$and/$or/$nor must be a nonempty array", ErrorKind::InvalidOperation)
    })?;
    clauses
        .iter()
        .map(|clause| {
            clause.as_document().ok_or_else(|| {
                FacadeError::new("$and/$or/$nor entries must be objects", ErrorKind::InvalidOperation)
            })
        })
        .collect()
}

fn all_match(document: &Document, condition: &Value) -> FacadeResult<bool> {
    for clause in sub_filters(condition)? {
        if !matches(document, clause)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_match(document: &Document, condition: &Value) -> FacadeResult<bool> {
    for clause in sub_filters(condition)? {
        if matches(document, clause)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_operator_document(condition: &Value) -> bool {
    condition
        .as_document()
        .and_then(|doc| doc.keys().next())
        .map(|key| key.starts_with('$'))
        .unwrap_or(false)
}

fn field_matches(value: Option<&Value>, condition: &Value) -> FacadeResult<bool> {
    let operators = match condition.as_document() {
        Some(operators) if is_operator_document(condition) => operators,
        _ => return Ok(equals(value, condition)),
    };

    for (op, operand) in operators.iter() {
        let matched = match op.as_str() {
            "$eq" => equals(value, operand),
            "$ne" => !equals(value, operand),
            "$gt" => compares(value, operand, |o| o == Ordering::Greater),
            "$gte" => compares(value, operand, |o| o != Ordering::Less),
            "$lt" => compares(value, operand, |o| o == Ordering::Less),
            "$lte" => compares(value, operand, |o| o != Ordering::Greater),
            "$in" => in_values(value, operand)?,
            "$nin" => !in_values(value, operand)?,
            "$exists" => value.is_some() == operand.is_truthy(),
            "$size" => match (value.and_then(|v| v.as_array()), operand.as_integer()) {
                (Some(items), Some(size)) => items.len() as i64 == size,
                _ => false,
            },
            "$regex" => regex_matches(value, operand, operators.get_value("$options"))?,
            "$options" => true,
            "$not" => !field_matches(value, operand)?,
            _ => {
                log::error!("Unknown query operator {}", op);
                return Err(FacadeError::new(
                    &format!("unknown operator: {}", op),
                    ErrorKind::InvalidOperation,
                ));
            }
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn equals(value: Option<&Value>, expected: &Value) -> bool {
    match value {
        None => expected.is_null(),
        Some(Value::Array(items)) => {
            items.iter().any(|item| item == expected) || matches!(expected, Value::Array(e) if e == items)
        }
        Some(value) => value == expected,
    }
}

/// Range comparison only holds between values of the same type family.
fn comparable(a: &Value, b: &Value) -> bool {
    (a.is_number() && b.is_number()) || std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn compares(value: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    let check = |candidate: &Value| comparable(candidate, operand) && accept(candidate.cmp(operand));
    match value {
        None => false,
        Some(Value::Array(items)) if !operand.is_array() => items.iter().any(check),
        Some(value) => check(value),
    }
}

fn in_values(value: Option<&Value>, operand: &Value) -> FacadeResult<bool> {
    let candidates = operand
        .as_array()
        .ok_or_else(|| FacadeError::new("$in/$nin needs an array", ErrorKind::InvalidOperation))?;
    Ok(candidates.iter().any(|candidate| equals(value, candidate)))
}

fn regex_matches(value: Option<&Value>, pattern: &Value, options: Option<&Value>) -> FacadeResult<bool> {
    let pattern = pattern
        .as_string()
        .ok_or_else(|| FacadeError::new("$regex has to be a string", ErrorKind::InvalidOperation))?;
    let flags = options.and_then(|o| o.as_string()).map(String::as_str).unwrap_or("");
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()?;

    let check = |candidate: &Value| candidate.as_string().map(|s| regex.is_match(s)).unwrap_or(false);
    Ok(match value {
        None => false,
        Some(Value::Array(items)) => items.iter().any(check),
        Some(value) => check(value),
    })
}
