use std::collections::{BTreeSet, HashMap};

/// Vocabulary of one categorical column.
///
/// Codes follow the sorted (byte-wise) order of the distinct values seen when
/// the attribute was fitted, so `values[code]` decodes and `label_to_index`
/// encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    /// Fits the vocabulary on every observed value of a column.
    pub fn fit<'a, I>(name: String, observed: I) -> NominalAttribute
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = observed.into_iter().collect();
        let values: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    #[inline]
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.label_to_index.get(value).copied()
    }

    #[inline]
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.values.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
