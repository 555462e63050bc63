use crate::collection::Document;
use crate::common::{
    Value, ERR_BAD_VALUE, ERR_STAGE_SHAPE, ERR_UNKNOWN_STAGE, REPLY_CODE, REPLY_ERRMSG, REPLY_OK,
    REPLY_RESULT,
};
use crate::errors::FacadeResult;
use crate::store::memory::matcher::matches;
use crate::store::memory::projection::{project, sort_documents};

/// A failed stage, reported in the reply instead of as an error.
struct StageError {
    code: i64,
    errmsg: String,
}

impl StageError {
    fn new(code: i64, errmsg: impl Into<String>) -> Self {
        StageError {
            code,
            errmsg: errmsg.into(),
        }
    }
}

/// Runs `pipeline` over `documents` and builds the store reply.
///
/// Success replies are `{ok: 1, result: [...]}`; a malformed or unknown
/// stage yields `{ok: 0, code, errmsg}` the way a server would answer.
/// Supported stages: `$match`, `$sort`, `$skip`, `$limit`, `$project` and
/// `$count`.
pub(crate) fn run_pipeline(documents: Vec<Document>, pipeline: &[Document]) -> Document {
    match run_stages(documents, pipeline) {
        Ok(result) => {
            let mut reply = Document::new();
            reply.put(REPLY_OK, 1.0);
            reply.put(REPLY_RESULT, result);
            reply
        }
        Err(error) => {
            log::warn!("Aggregation failed with code {}: {}", error.code, error.errmsg);
            let mut reply = Document::new();
            reply.put(REPLY_OK, 0.0);
            reply.put(REPLY_CODE, error.code);
            reply.put(REPLY_ERRMSG, error.errmsg);
            reply
        }
    }
}

fn run_stages(mut documents: Vec<Document>, pipeline: &[Document]) -> Result<Vec<Document>, StageError> {
    for stage in pipeline {
        let (name, spec) = match (stage.size(), stage.iter().next()) {
            (1, Some(entry)) => entry,
            _ => {
                return Err(StageError::new(
                    ERR_STAGE_SHAPE,
                    "A pipeline stage specification object must contain exactly one field.",
                ))
            }
        };
        documents = run_stage(documents, name, spec)?;
    }
    Ok(documents)
}

fn run_stage(documents: Vec<Document>, name: &str, spec: &Value) -> Result<Vec<Document>, StageError> {
    match name {
        "$match" => {
            let filter = stage_document(name, spec)?;
            let mut kept = Vec::with_capacity(documents.len());
            for document in documents {
                if bad_value(matches(&document, filter))? {
                    kept.push(document);
                }
            }
            Ok(kept)
        }
        "$sort" => {
            let mut documents = documents;
            bad_value(sort_documents(&mut documents, stage_document(name, spec)?))?;
            Ok(documents)
        }
        "$skip" => {
            let skip = stage_count(name, spec)?;
            Ok(documents.into_iter().skip(skip).collect())
        }
        "$limit" => {
            let limit = stage_count(name, spec)?;
            Ok(documents.into_iter().take(limit).collect())
        }
        "$project" => {
            let projection = stage_document(name, spec)?;
            documents
                .iter()
                .map(|document| bad_value(project(document, projection)))
                .collect()
        }
        "$count" => {
            let field = spec
                .as_string()
                .filter(|field| !field.is_empty() && !field.starts_with('$'))
                .ok_or_else(|| StageError::new(ERR_BAD_VALUE, "the count field must be a non-empty string"))?;
            let mut counted = Document::new();
            counted.put(field.as_str(), documents.len() as i64);
            Ok(vec![counted])
        }
        _ => Err(StageError::new(
            ERR_UNKNOWN_STAGE,
            format!("Unrecognized pipeline stage name: '{}'", name),
        )),
    }
}

fn stage_document<'a>(name: &str, spec: &'a Value) -> Result<&'a Document, StageError> {
    spec.as_document()
        .ok_or_else(|| StageError::new(ERR_BAD_VALUE, format!("the {} stage specification must be an object", name)))
}

fn stage_count(name: &str, spec: &Value) -> Result<usize, StageError> {
    spec.as_integer()
        .filter(|count| *count >= 0)
        .map(|count| count as usize)
        .ok_or_else(|| StageError::new(ERR_BAD_VALUE, format!("the {} stage needs a non-negative integer", name)))
}

fn bad_value<T>(result: FacadeResult<T>) -> Result<T, StageError> {
    result.map_err(|err| StageError::new(ERR_BAD_VALUE, err.message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn orders() -> Vec<Document> {
        vec![
            doc! { "_id": 1, status: "A", amount: 50 },
            doc! { "_id": 2, status: "B", amount: 20 },
            doc! { "_id": 3, status: "A", amount: 10 },
            doc! { "_id": 4, status: "A", amount: 40 },
        ]
    }

    #[test]
    fn test_match_sort_skip_limit_project() {
        let reply = run_pipeline(
            orders(),
            &[
                doc! { "$match": { status: "A" } },
                doc! { "$sort": { amount: (-1) } },
                doc! { "$skip": 1 },
                doc! { "$limit": 1 },
                doc! { "$project": { amount: 1, "_id": 0 } },
            ],
        );
        assert!(reply.get("ok").is_truthy());
        assert_eq!(reply.get("result"), Value::from(vec![doc! { amount: 40 }]));
    }

    #[test]
    fn test_count_stage() {
        let reply = run_pipeline(orders(), &[doc! { "$match": { status: "A" } }, doc! { "$count": "n" }]);
        assert_eq!(reply.get("result"), Value::from(vec![doc! { n: 3_i64 }]));
    }

    #[test]
    fn test_empty_pipeline_returns_everything() {
        let reply = run_pipeline(orders(), &[]);
        assert_eq!(reply.get("result").as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn test_unknown_stage_reports_code() {
        let reply = run_pipeline(orders(), &[doc! { "$bogus": {} }]);
        assert!(!reply.get("ok").is_truthy());
        assert_eq!(reply.get("code"), Value::I64(ERR_UNKNOWN_STAGE));
        assert!(reply.get("errmsg").as_string().unwrap().contains("$bogus"));
    }

    #[test]
    fn test_malformed_stages() {
        let reply = run_pipeline(orders(), &[doc! { "$skip": 1, "$limit": 2 }]);
        assert_eq!(reply.get("code"), Value::I64(ERR_STAGE_SHAPE));

        let reply = run_pipeline(orders(), &[doc! { "$limit": (-1) }]);
        assert_eq!(reply.get("code"), Value::I64(ERR_BAD_VALUE));

        let reply = run_pipeline(orders(), &[doc! { "$match": { a: { "$bad": 1 } } }]);
        assert_eq!(reply.get("code"), Value::I64(ERR_BAD_VALUE));
    }
}
