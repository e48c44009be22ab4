//! Generic filter/search/sort/pagination query engine.
//!
//! A [`ListQuery`] holds exactly one [`Condition`]; both the data select and
//! the count select are derived from that same value. The two statements
//! therefore carry identical WHERE clauses and bound parameters, the data
//! statement differing only by its trailing ORDER BY / LIMIT / OFFSET.

use markethall_common::{AppError, AppResult, SortDir};
use sea_orm::{
    Condition, ConnectionTrait, DbBackend, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, Statement,
};

/// Convert the wire-level sort direction into a sea-query order.
#[must_use]
pub fn order_from(dir: SortDir) -> Order {
    match dir {
        SortDir::Asc => Order::Asc,
        SortDir::Desc => Order::Desc,
    }
}

/// A fully resolved list query for entity `E`.
///
/// The sort column is always an `E::Column` resolved through a per-entity
/// allow list upstream; request-controlled strings never reach the statement
/// as identifiers.
#[derive(Debug, Clone)]
pub struct ListQuery<E: EntityTrait> {
    condition: Condition,
    sort_column: E::Column,
    sort_order: Order,
    page: u64,
    limit: u64,
}

impl<E: EntityTrait> ListQuery<E> {
    /// Build a list query. `page` is 1-based; both `page` and `limit` are
    /// expected pre-normalized.
    #[must_use]
    pub fn new(
        condition: Condition,
        sort_column: E::Column,
        sort_dir: SortDir,
        page: u64,
        limit: u64,
    ) -> Self {
        Self {
            condition,
            sort_column,
            sort_order: order_from(sort_dir),
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    fn data_select(&self) -> Select<E> {
        E::find()
            .filter(self.condition.clone())
            .order_by(self.sort_column, self.sort_order.clone())
            .limit(self.limit)
            .offset((self.page - 1) * self.limit)
    }

    fn count_select(&self) -> Select<E> {
        E::find().filter(self.condition.clone())
    }

    /// The built data statement, for inspection.
    #[must_use]
    pub fn data_statement(&self, backend: DbBackend) -> Statement {
        self.data_select().build(backend)
    }

    /// The built count statement, for inspection.
    #[must_use]
    pub fn count_statement(&self, backend: DbBackend) -> Statement {
        self.count_select().build(backend)
    }

    /// Execute both statements and return the page plus the total match
    /// count.
    ///
    /// The two statements do not share a snapshot; rows written between them
    /// can skew `total` against the returned page. Accepted trade-off.
    pub async fn fetch<C>(&self, db: &C) -> AppResult<(Vec<E::Model>, u64)>
    where
        C: ConnectionTrait,
        E::Model: Send + Sync,
    {
        let total = self
            .count_select()
            .count(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = self
            .data_select()
            .all(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::professional::{self, ProfessionalStatus};
    use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
    use sea_orm::ColumnTrait;

    fn sample_condition() -> Condition {
        Condition::all()
            .add(professional::Column::Status.eq(ProfessionalStatus::Approved))
            .add(professional::Column::IsActive.eq(true))
            .add(
                Condition::any()
                    .add(Expr::col(professional::Column::FirstName).ilike("%ali%"))
                    .add(Expr::col(professional::Column::LastName).ilike("%ali%")),
            )
    }

    #[test]
    fn count_and_data_share_where_and_params() {
        let query: ListQuery<professional::Entity> = ListQuery::new(
            sample_condition(),
            professional::Column::CreatedAt,
            SortDir::Desc,
            2,
            10,
        );

        let data = query.data_statement(DbBackend::Postgres);
        let count = query.count_statement(DbBackend::Postgres);

        // Identical up to the trailing ORDER BY / LIMIT / OFFSET.
        assert!(
            data.sql.starts_with(&count.sql),
            "data statement must extend the count statement: {} vs {}",
            data.sql,
            count.sql
        );

        let data_values = data.values.unwrap().0;
        let count_values = count.values.unwrap().0;
        assert_eq!(data_values.len(), count_values.len() + 2);
        assert_eq!(&data_values[..count_values.len()], &count_values[..]);
    }

    #[test]
    fn pagination_lands_in_trailing_placeholders() {
        let query: ListQuery<professional::Entity> = ListQuery::new(
            Condition::all().add(professional::Column::IsActive.eq(true)),
            professional::Column::CreatedAt,
            SortDir::Desc,
            3,
            12,
        );

        let data = query.data_statement(DbBackend::Postgres);
        assert!(data.sql.contains("ORDER BY"));
        assert!(data.sql.contains("LIMIT"));
        assert!(data.sql.contains("OFFSET"));

        let values = data.values.unwrap().0;
        let tail: Vec<String> = values[values.len() - 2..]
            .iter()
            .map(|v| format!("{v:?}"))
            .collect();
        assert!(tail[0].contains("12"), "limit bind missing: {tail:?}");
        assert!(tail[1].contains("24"), "offset bind missing: {tail:?}");
    }

    #[test]
    fn search_terms_are_bound_not_interpolated() {
        let query: ListQuery<professional::Entity> = ListQuery::new(
            Condition::all().add(
                Expr::col(professional::Column::FirstName).ilike("%'; DROP TABLE professional;--%"),
            ),
            professional::Column::CreatedAt,
            SortDir::Desc,
            1,
            10,
        );

        let data = query.data_statement(DbBackend::Postgres);
        assert!(!data.sql.contains("DROP TABLE"));
    }
}
