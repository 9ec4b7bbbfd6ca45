// ── Query builder for the relational REST API ──
//
// Translates typed filter/order/selection choices into the query-string
// grammar the gateway understands: `select=...`, `{col}=eq.{v}`,
// `or=(a.ilike.*q*,b.ilike.*q*)`, `order={col}.{asc|desc}`, `limit=N`.

use std::fmt;

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A query against one relation.
///
/// Built by the domain services, consumed by [`RestClient`](crate::RestClient).
/// Filters accumulate conjunctively; `matching_any` adds one disjunctive
/// group (substring match across several columns).
#[derive(Debug, Clone)]
pub struct Query {
    relation: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<u32>,
}

impl Query {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            select: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Column selection, including embedded relations
    /// (e.g. `"*,venues(name)"` joins the parent venue's name).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Equality filter: `column = value`.
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive substring match across several columns (OR group).
    pub fn matching_any(mut self, columns: &[&str], needle: &str) -> Self {
        let group = columns
            .iter()
            .map(|c| format!("{c}.ilike.*{needle}*"))
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push(("or".to_owned(), format!("({group})")));
        self
    }

    /// Result ordering. Ties are broken by backend insertion order.
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_owned(), direction));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Render as query-string pairs.
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);

        if let Some(ref select) = self.select {
            params.push(("select".to_owned(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some((ref column, direction)) = self.order {
            params.push(("order".to_owned(), format!("{column}.{direction}")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }

        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn bare_query_has_no_params() {
        let q = Query::new("venues");
        assert_eq!(q.relation(), "venues");
        assert!(q.params().is_empty());
    }

    #[test]
    fn eq_filter_renders_postgrest_grammar() {
        let q = Query::new("raw_submissions").eq("user_id", "u-1").eq("status", "draft");
        let params = q.params();
        assert_eq!(param(&params, "user_id"), Some("eq.u-1"));
        assert_eq!(param(&params, "status"), Some("eq.draft"));
    }

    #[test]
    fn order_renders_column_dot_direction() {
        let q = Query::new("venues").order("updated_at", Direction::Desc);
        assert_eq!(param(&q.params(), "order"), Some("updated_at.desc"));
    }

    #[test]
    fn matching_any_builds_or_group() {
        let q = Query::new("venues").matching_any(&["name", "address"], "depot");
        assert_eq!(
            param(&q.params(), "or"),
            Some("(name.ilike.*depot*,address.ilike.*depot*)")
        );
    }

    #[test]
    fn select_with_embed_passes_through() {
        let q = Query::new("raw_submissions").select("*,venues(name)");
        assert_eq!(param(&q.params(), "select"), Some("*,venues(name)"));
    }

    #[test]
    fn params_preserve_filter_order() {
        let q = Query::new("venues")
            .select("*")
            .eq("status", "safe")
            .order("updated_at", Direction::Desc)
            .limit(10);
        let params = q.params();
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["select", "status", "order", "limit"]);
    }
}
