use crate::collection::Document;
use crate::common::{SortOrder, Value, DOC_ID};
use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use std::cmp::Ordering;

/// Sorts `documents` in place by a sort specification such as
/// `{age: -1, name: 1}`. Missing fields sort as null.
pub(crate) fn sort_documents(documents: &mut [Document], spec: &Document) -> FacadeResult<()> {
    let keys = spec
        .iter()
        .map(|(field, direction)| {
            SortOrder::from_value(direction)
                .map(|order| (field.clone(), order))
                .ok_or_else(|| {
                    log::error!("Invalid sort direction {} for {}", direction, field);
                    FacadeError::new(
                        &format!("bad sort specification for field {}", field),
                        ErrorKind::InvalidOperation,
                    )
                })
        })
        .collect::<FacadeResult<Vec<_>>>()?;

    documents.sort_by(|a, b| {
        for (field, order) in &keys {
            let ordering = a.get(field).cmp(&b.get(field));
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
    Ok(())
}

/// Applies a projection document.
///
/// An inclusion projection (`{name: 1}`) keeps `_id` plus the listed fields;
/// an exclusion projection (`{secret: 0}`) drops the listed fields. `_id`
/// can be excluded in either form. Mixing both forms is rejected.
pub(crate) fn project(document: &Document, spec: &Document) -> FacadeResult<Document> {
    if spec.is_empty() {
        return Ok(document.clone());
    }

    let include_id = spec.get_value(DOC_ID).map(Value::is_truthy).unwrap_or(true);
    let fields = spec
        .iter()
        .filter(|(field, _)| field.as_str() != DOC_ID)
        .collect::<Vec<_>>();
    let inclusions = fields.iter().filter(|(_, flag)| flag.is_truthy()).count();

    if inclusions > 0 && inclusions < fields.len() {
        log::error!("Projection {} mixes inclusion and exclusion", spec);
        return Err(FacadeError::new(
            "projection cannot have a mix of inclusion and exclusion",
            ErrorKind::InvalidOperation,
        ));
    }

    let mut projected = if inclusions > 0 || (fields.is_empty() && include_id) {
        let mut projected = Document::new();
        if let Some(id) = document.id() {
            projected.put(DOC_ID, id.clone());
        }
        for (field, _) in &fields {
            if let Some(value) = document.get_value(field) {
                projected.put_path(field, value.clone());
            }
        }
        projected
    } else {
        let mut projected = document.clone();
        for (field, _) in &fields {
            projected.remove_path(field);
        }
        projected
    };

    if !include_id {
        projected.remove(DOC_ID);
    }
    Ok(projected)
}
