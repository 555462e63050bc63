use crate::collection::Document;
use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, FacadeError, FacadeResult};

/// True when `update` is made of update operators (`$set`, `$inc`, ...)
/// rather than being a replacement document.
pub(crate) fn is_operator_update(update: &Document) -> bool {
    update.keys().next().map(|key| key.starts_with('$')).unwrap_or(false)
}

/// Applies `update` to a copy of `original`.
///
/// Operator updates support `$set`, `$unset`, `$inc` and `$push`; any other
/// document replaces every field but `_id`. The `_id` of an existing
/// document can never change.
pub(crate) fn apply_update(original: &Document, update: &Document) -> FacadeResult<Document> {
    let updated = if is_operator_update(update) {
        apply_operators(original, update)?
    } else {
        replace(original, update)?
    };

    if original.id().is_some() && updated.id() != original.id() {
        log::error!("Update would change _id of {}", original);
        return Err(FacadeError::new(
            "the (immutable) field '_id' was found to have been altered",
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(updated)
}

/// Seed of an upserted document: the equality fields of the query.
pub(crate) fn upsert_seed(query: &Document) -> Document {
    let mut seed = Document::new();
    for (key, value) in query.iter() {
        if key.starts_with('$') {
            continue;
        }
        let is_operator = value
            .as_document()
            .and_then(|doc| doc.keys().next())
            .map(|k| k.starts_with('$'))
            .unwrap_or(false);
        if !is_operator {
            seed.put_path(key, value.clone());
        }
    }
    seed
}

fn replace(original: &Document, replacement: &Document) -> FacadeResult<Document> {
    let mut document = Document::new();
    match (original.id(), replacement.id()) {
        (Some(id), _) => {
            document.put(DOC_ID, id.clone());
        }
        (None, Some(id)) => {
            document.put(DOC_ID, id.clone());
        }
        (None, None) => {}
    }
    for (key, value) in replacement.iter() {
        if key.starts_with('$') {
            log::error!("Replacement document contains operator {}", key);
            return Err(FacadeError::new(
                &format!("cannot mix operators and fields in an update: {}", key),
                ErrorKind::InvalidOperation,
            ));
        }
        if key != DOC_ID {
            document.put(key.clone(), value.clone());
        }
    }
    if let (Some(original_id), Some(replacement_id)) = (original.id(), replacement.id()) {
        if original_id != replacement_id {
            document.put(DOC_ID, replacement_id.clone());
        }
    }
    Ok(document)
}

fn apply_operators(original: &Document, update: &Document) -> FacadeResult<Document> {
    let mut document = original.clone();
    for (op, spec) in update.iter() {
        let fields = spec.as_document().ok_or_else(|| {
            FacadeError::new(&format!("modifier {} expects an object", op), ErrorKind::InvalidOperation)
        })?;

        for (path, operand) in fields.iter() {
            match op.as_str() {
                "$set" => document.put_path(path, operand.clone()),
                "$unset" => {
                    document.remove_path(path);
                }
                "$inc" => {
                    let current = document.get(path);
                    document.put_path(path, increment(path, &current, operand)?);
                }
                "$push" => {
                    let mut items = match document.get(path) {
                        Value::Null => Vec::new(),
                        Value::Array(items) => items,
                        _ => {
                            log::error!("Cannot $push to non-array field {}", path);
                            return Err(FacadeError::new(
                                &format!("the field '{}' must be an array", path),
                                ErrorKind::InvalidDataType,
                            ));
                        }
                    };
                    items.push(operand.clone());
                    document.put_path(path, items);
                }
                _ => {
                    log::error!("Unknown update operator {}", op);
                    return Err(FacadeError::new(
                        &format!("unknown modifier: {}", op),
                        ErrorKind::InvalidOperation,
                    ));
                }
            }
        }
    }
    Ok(document)
}

fn increment(path: &str, current: &Value, by: &Value) -> FacadeResult<Value> {
    if !by.is_number() {
        log::error!("Cannot $inc {} by non-numeric {}", path, by);
        return Err(FacadeError::new(
            &format!("cannot increment with non-numeric argument: {{{}: {}}}", path, by),
            ErrorKind::InvalidDataType,
        ));
    }

    Ok(match (current, by) {
        (Value::Null, _) => by.clone(),
        (Value::I32(a), Value::I32(b)) => match a.checked_add(*b) {
            Some(sum) => Value::I32(sum),
            None => Value::I64(*a as i64 + *b as i64),
        },
        (Value::F64(_), _) | (_, Value::F64(_)) if current.is_number() => {
            Value::F64(current.as_number().unwrap_or_default() + by.as_number().unwrap_or_default())
        }
        _ if current.is_number() => Value::I64(
            current
                .as_integer()
                .unwrap_or_default()
                .wrapping_add(by.as_integer().unwrap_or_default()),
        ),
        _ => {
            log::error!("Cannot $inc non-numeric field {}", path);
            return Err(FacadeError::new(
                &format!("cannot apply $inc to a value of non-numeric type: {}", path),
                ErrorKind::InvalidDataType,
            ));
        }
    })
}
