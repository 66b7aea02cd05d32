use sqlx::{Postgres, QueryBuilder};

pub mod crew;
pub mod order;
pub mod route;
pub mod station;
pub mod train;
pub mod train_type;
pub mod trip;
pub mod user;

/// Wraps a user-supplied fragment for a case-insensitive containment match.
/// Literal `%` wildcards are stripped so callers cannot widen the pattern.
pub(crate) fn contains_pattern(value: &str) -> String {
    format!("%{}%", value.replace('%', ""))
}

/// Keeps track of whether the next filter fragment needs `WHERE` or `AND`.
pub(crate) struct FilterPrefix {
    first: bool,
}

impl FilterPrefix {
    pub(crate) fn new() -> Self {
        Self { first: true }
    }

    pub(crate) fn push(&mut self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(if self.first { " WHERE " } else { " AND " });
        self.first = false;
    }
}

pub(crate) fn push_page(
    builder: &mut QueryBuilder<'_, Postgres>,
    limit: i64,
    offset: i64,
) {
    builder.push(" LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_wraps_and_strips_wildcards() {
        assert_eq!(contains_pattern("kiel"), "%kiel%");
        assert_eq!(contains_pattern("100%"), "%100%");
        assert_eq!(contains_pattern(""), "%%");
    }
}
