//! Column metadata and type information

use serde::{Deserialize, Serialize};

/// Fine-grained inferred cell type for a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Mixed,
}

impl CellType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Null, t) | (t, CellType::Null) => t,
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            (CellType::Date, CellType::DateTime) | (CellType::DateTime, CellType::Date) => {
                CellType::DateTime
            }
            _ => CellType::Mixed,
        }
    }

    /// Coarse kind used by the cleaning stages.
    ///
    /// A column with no values at all counts as numeric: it holds nothing but
    /// missing markers, which is how a numeric reader would type it.
    pub fn kind(self) -> ColumnKind {
        match self {
            CellType::Null | CellType::Int | CellType::Float => ColumnKind::Numeric,
            CellType::Bool | CellType::String | CellType::Date | CellType::DateTime => {
                ColumnKind::Text
            }
            CellType::Mixed => ColumnKind::Mixed,
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Null => write!(f, "null"),
            CellType::Bool => write!(f, "bool"),
            CellType::Int => write!(f, "int"),
            CellType::Float => write!(f, "float"),
            CellType::String => write!(f, "string"),
            CellType::Date => write!(f, "date"),
            CellType::DateTime => write!(f, "datetime"),
            CellType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Column kind, decided once when the table is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Numeric,
    Text,
    Mixed,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        self == ColumnKind::Numeric
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Mixed => write!(f, "mixed"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header), unique within a table
    pub name: String,
    /// Inferred type from data
    pub inferred_type: CellType,
    /// Coarse kind fixed at load time
    pub kind: ColumnKind,
}

impl Column {
    /// Create a new untyped column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inferred_type: CellType::Null,
            kind: ColumnKind::Numeric,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }
}

/// Make header names unique and non-empty.
///
/// Blank names become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
/// appended, skipping suffixes that are already taken.
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    use rustc_hash::{FxHashMap, FxHashSet};

    let raw: Vec<String> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.as_ref();
            if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut taken: FxHashSet<String> = raw.iter().cloned().collect();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut counters: FxHashMap<&str, usize> = FxHashMap::default();
    let mut out = Vec::with_capacity(raw.len());

    for name in &raw {
        if seen.insert(name.as_str()) {
            out.push(name.clone());
            continue;
        }

        let counter = counters.entry(name.as_str()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}.{}", name, counter);
            if taken.insert(candidate.clone()) {
                out.push(candidate);
                break;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen() {
        assert_eq!(CellType::Null.widen(CellType::Int), CellType::Int);
        assert_eq!(CellType::Int.widen(CellType::Float), CellType::Float);
        assert_eq!(CellType::Date.widen(CellType::DateTime), CellType::DateTime);
        assert_eq!(CellType::Int.widen(CellType::String), CellType::Mixed);
    }

    #[test]
    fn test_kind() {
        assert_eq!(CellType::Int.kind(), ColumnKind::Numeric);
        assert_eq!(CellType::Null.kind(), ColumnKind::Numeric);
        assert_eq!(CellType::Bool.kind(), ColumnKind::Text);
        assert_eq!(CellType::Mixed.kind(), ColumnKind::Mixed);
    }

    #[test]
    fn test_dedupe_names() {
        assert_eq!(
            dedupe_names(["a", "b", "a", "", "a"]),
            vec!["a", "b", "a.1", "Unnamed: 3", "a.2"]
        );
        // An existing "a.1" is not overwritten
        assert_eq!(dedupe_names(["a", "a.1", "a"]), vec!["a", "a.1", "a.2"]);
    }
}
