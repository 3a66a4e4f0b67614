use serde::{Deserialize, Serialize};

/// Body of a dataset creation request.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetMeta {
    pub name: String,
    pub description: String,
}

/// A single dataset column: its name, PANDA type and whether it is indexed as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: &'static str,
    pub typed: bool,
}

impl Column {
    pub const fn new(name: &'static str, kind: &'static str, typed: bool) -> Self {
        Self { name, kind, typed }
    }
}

/// Column schema sent as query parameters when a dataset is created.
#[derive(Debug, Clone, Default)]
pub struct ColumnSchema {
    pub columns: Vec<Column>,
}

impl ColumnSchema {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The `columns`, `column_types` and `typed_columns` query parameters.
    pub fn query_params(&self) -> [(&'static str, String); 3] {
        [
            ("columns", self.join(|c| c.name.to_string())),
            ("column_types", self.join(|c| c.kind.to_string())),
            ("typed_columns", self.join(|c| c.typed.to_string())),
        ]
    }

    fn join(&self, f: impl Fn(&Column) -> String) -> String {
        self.columns.iter().map(f).collect::<Vec<_>>().join(",")
    }
}

/// One row submitted to a dataset's data endpoint.
///
/// `data` is positional and must line up with the dataset's columns. `None`
/// serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataObject {
    pub external_id: String,
    pub data: Vec<Option<String>>,
}

/// Wrapper for the data endpoint's upsert body.
#[derive(Debug, Clone, Serialize)]
pub struct DataUpload<'a> {
    pub objects: &'a [DataObject],
}
