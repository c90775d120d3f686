use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

/// Label of the "no grouping" entry offered ahead of the categorical columns.
pub const NONE_OPTION: &str = "<none>";

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Categorical,
    Numeric,
    Boolean,
    #[serde(other)]
    Other,
}

/// A single cell
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl Value {
    /// Numeric reading used by threshold comparisons.
    ///
    /// Missing cells read as 0, booleans as 0/1, and text as its parsed number
    /// (blank text is 0). Text that is not a number has no reading and never
    /// passes a comparison.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Missing => Some(0.0),
            Value::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    Some(0.0)
                } else {
                    s.parse::<f64>().ok()
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub data: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: DType, data: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            data,
        }
    }

    /// Numeric column from plain floats
    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(
            name,
            DType::Numeric,
            values.iter().map(|&v| Value::Number(v)).collect(),
        )
    }

    /// Categorical column from string labels
    pub fn categorical<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self::new(
            name,
            DType::Categorical,
            values
                .iter()
                .map(|v| Value::Text(v.as_ref().to_string()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Column-oriented dataset for one data category.
///
/// Built once when the category is loaded and shared read-only by every plot
/// that references it. Column names are unique and all columns have the same
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(anyhow!("Duplicate column name '{}'", col.name));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(anyhow!(
                    "Column '{}' has {} values, expected {} (length of '{}')",
                    bad.name,
                    bad.len(),
                    expected,
                    first.name
                ));
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The shared column length (0 for a dataset without columns)
    pub fn len(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all categorical columns, in dataset order
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype == DType::Categorical)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Options for the group-by selector: `<none>` followed by every categorical column
    pub fn group_by_options(&self) -> Vec<String> {
        std::iter::once(NONE_OPTION)
            .chain(self.categorical_columns())
            .map(str::to_string)
            .collect()
    }

    /// Create a Dataset from the column-oriented dashboard format:
    /// `{ "columns": [ { "name": ..., "dtype": ..., "data": [...] } ] }`
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let raw: RawDataset = serde_json::from_value(value.clone())
            .context("Input data must be an object with a 'columns' array")?;
        Self::new(raw.columns)
    }

    /// Create a Dataset from a JSON array of objects (one object per record)
    pub fn from_records(value: &serde_json::Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        // Headers come from the first object, in its own key order
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut cells: Vec<Vec<Value>> = vec![Vec::with_capacity(array.len()); headers.len()];
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            for (idx, header) in headers.iter().enumerate() {
                let val = match obj.get(header) {
                    Some(serde_json::Value::Number(n)) => n
                        .as_f64()
                        .map(Value::Number)
                        .ok_or_else(|| anyhow!("Number out of range in field '{}'", header))?,
                    Some(serde_json::Value::String(s)) => Value::Text(s.clone()),
                    Some(serde_json::Value::Bool(b)) => Value::Bool(*b),
                    Some(serde_json::Value::Null) | None => Value::Missing,
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                cells[idx].push(val);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, data)| {
                let dtype = infer_dtype(&data);
                Column { name, dtype, data }
            })
            .collect();
        Self::new(columns)
    }

    /// Read a CSV table (header row required) and infer column types
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() {
            return Err(anyhow!("CSV input has no header row"));
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for (line, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
            for (idx, slot) in raw.iter_mut().enumerate() {
                slot.push(record.get(idx).unwrap_or("").trim().to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, strings)| column_from_strings(name, strings))
            .collect();
        Self::new(columns)
    }
}

/// A column is numeric when every non-empty cell parses as a float
fn column_from_strings(name: String, strings: Vec<String>) -> Column {
    let all_numeric = strings
        .iter()
        .filter(|s| !s.is_empty())
        .all(|s| s.parse::<f64>().is_ok());

    if all_numeric {
        let data = strings
            .iter()
            .map(|s| match s.parse::<f64>() {
                Ok(v) => Value::Number(v),
                Err(_) => Value::Missing,
            })
            .collect();
        Column::new(name, DType::Numeric, data)
    } else {
        let data = strings
            .into_iter()
            .map(|s| if s.is_empty() { Value::Missing } else { Value::Text(s) })
            .collect();
        Column::new(name, DType::Categorical, data)
    }
}

fn infer_dtype(data: &[Value]) -> DType {
    let mut present = data.iter().filter(|v| !matches!(v, Value::Missing)).peekable();
    if present.peek().is_none() {
        return DType::Other;
    }
    let present: Vec<&Value> = present.collect();
    if present.iter().all(|v| matches!(v, Value::Number(_))) {
        DType::Numeric
    } else if present.iter().all(|v| matches!(v, Value::Bool(_))) {
        DType::Boolean
    } else {
        DType::Categorical
    }
}
