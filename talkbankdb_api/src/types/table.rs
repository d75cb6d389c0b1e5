use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Tabular result of every data query: column names plus rows of cells.
///
/// Every row has exactly as many cells as there are column headings; the
/// constructor rejects anything else.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResultTable {
    /// Column names, in display order.
    pub col_headings: Vec<String>,
    /// Rows of cell values, each aligned with `col_headings`.
    pub data: Vec<Vec<String>>,
}

impl ResultTable {
    /// Builds a table after checking that every row matches the heading count.
    pub fn new(col_headings: Vec<String>, data: Vec<Vec<String>>) -> Result<Self, Error> {
        let width = col_headings.len();
        if let Some((index, row)) = data.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::MalformedResponse(format!(
                "row {} has {} cells but there are {} column headings",
                index,
                row.len(),
                width
            )));
        }
        Ok(Self { col_headings, data })
    }

    /// Reshapes a service response into a table.
    ///
    /// The table may sit at the top level or under `respMsg`. Scalar cells
    /// that are not strings are rendered as JSON text and `null` becomes an
    /// empty string.
    pub fn from_response(value: Value) -> Result<Self, Error> {
        let mut object = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };
        if !object.contains_key("colHeadings") {
            match object.remove("respMsg") {
                Some(Value::Object(inner)) => object = inner,
                Some(Value::String(message)) => {
                    return Err(Error::MalformedResponse(format!(
                        "expected a table, service replied: {}",
                        message
                    )))
                }
                _ => {}
            }
        }

        let headings = match object.remove("colHeadings") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(Error::MalformedResponse(format!(
                        "column heading must be a string, got {}",
                        json_kind(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(Error::MalformedResponse(format!(
                    "colHeadings must be an array, got {}",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(Error::MalformedResponse(
                    "response has no colHeadings".to_string(),
                ))
            }
        };

        let rows = match object.remove("data") {
            Some(Value::Array(rows)) => rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| match row {
                    Value::Array(cells) => cells
                        .into_iter()
                        .map(cell_to_string)
                        .collect::<Result<Vec<_>, _>>(),
                    other => Err(Error::MalformedResponse(format!(
                        "row {} must be an array, got {}",
                        index,
                        json_kind(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(Error::MalformedResponse(format!(
                    "data must be an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        Self::new(headings, rows)
    }

    /// Position of a column by name.
    pub fn column_index(&self, heading: &str) -> Option<usize> {
        self.col_headings.iter().position(|h| h == heading)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, heading: &str) -> Option<Vec<&str>> {
        let index = self.column_index(heading)?;
        Some(
            self.data
                .iter()
                .filter_map(|row| row.get(index).map(String::as_str))
                .collect(),
        )
    }

    /// Cell at `row` under the named column.
    pub fn get(&self, row: usize, heading: &str) -> Option<&str> {
        let index = self.column_index(heading)?;
        self.data.get(row)?.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The text of a reply that carries a plain `respMsg` string instead of a
/// table. A refused login can come back this way with status 200.
pub(crate) fn service_message(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    if object.contains_key("colHeadings") {
        return None;
    }
    object.get("respMsg")?.as_str()
}

fn cell_to_string(cell: Value) -> Result<String, Error> {
    match cell {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        // Nested values (e.g. a list of languages) keep their JSON text.
        other => serde_json::to_string(&other).map_err(|e| {
            Error::MalformedResponse(format!("unrenderable cell: {}", e))
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
