use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

// Basic safety limits
const MAX_SEARCH_QUERY_LENGTH: usize = 1_000;

/// Escape LIKE wildcards so the term only ever matches literally
/// Escapes: % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\") // Escape backslash first
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Truncate to the search length limit without splitting a character.
fn truncate_term(term: &str) -> &str {
    match term.char_indices().nth(MAX_SEARCH_QUERY_LENGTH) {
        Some((index, _)) => &term[..index],
        None => term,
    }
}

/// Case-insensitive substring match of `term` against one column.
#[must_use]
pub fn build_like_condition<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(term).to_uppercase());
    Expr::expr(Func::upper(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Match rows where any of `columns` contains `term`.
///
/// Returns `None` when there is nothing to search: no columns, or a blank term.
#[must_use]
pub fn build_contains_condition<C>(term: &str, columns: &[C]) -> Option<Condition>
where
    C: ColumnTrait + Copy,
{
    let term = truncate_term(term.trim());
    if term.is_empty() || columns.is_empty() {
        return None;
    }

    Some(
        columns
            .iter()
            .fold(Condition::any(), |any, &column| {
                any.add(build_like_condition(column, term))
            }),
    )
}
