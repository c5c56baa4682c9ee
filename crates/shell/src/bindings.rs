use database::FIXED_QUERIES;

/// One trigger control and the query it runs.
///
/// Built once when the shell starts; a binding never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBinding {
    pub label: String,
    pub query: &'static str,
}

/// One binding per fixed query, labeled by its index.
pub fn default_bindings() -> Vec<QueryBinding> {
    FIXED_QUERIES
        .into_iter()
        .enumerate()
        .map(|(index, query)| QueryBinding {
            label: format!("Запрос {index}"),
            query,
        })
        .collect()
}
