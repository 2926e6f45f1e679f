use chrono::{DateTime, Utc};

use tasktrack_core::expense::{CategoryTotal, Expense, MonthlySummary, NewExpense};
use tasktrack_core::id::new_id;

use super::super::{pg_err, pg_not_found, PostgresDatabase};
use crate::DbError;

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    title: String,
    amount: f64,
    category: String,
    date: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(r: ExpenseRow) -> Self {
        Expense {
            id: r.id,
            title: r.title,
            amount: r.amount,
            category: r.category,
            date: r.date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category: String,
    total: f64,
    count: i64,
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_expense(&self, input: &NewExpense) -> Result<Expense, DbError> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            "INSERT INTO expenses (id, title, amount, category, date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, amount, category, date",
        )
        .bind(new_id())
        .bind(&input.title)
        .bind(input.amount)
        .bind(&input.category)
        .bind(input.date)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_expenses(&self) -> Result<Vec<Expense>, DbError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, title, amount, category, date FROM expenses
             ORDER BY date DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    pub(crate) async fn pg_delete_expense(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;

        if result.rows_affected() == 0 {
            return Err(pg_not_found(&format!("expense {id}")));
        }

        Ok(())
    }

    pub(crate) async fn pg_count_expenses(&self) -> Result<i64, DbError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await
            .map_err(pg_err)
    }

    pub(crate) async fn pg_summarize_expenses(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlySummary, DbError> {
        let (total, count): (f64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION, COUNT(*)
             FROM expenses WHERE date >= $1 AND date < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(MonthlySummary { total, count })
    }

    pub(crate) async fn pg_expense_totals_by_category(
        &self,
    ) -> Result<Vec<CategoryTotal>, DbError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT category, SUM(amount)::DOUBLE PRECISION AS total, COUNT(*) AS count
             FROM expenses GROUP BY category ORDER BY total DESC, category ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryTotal {
                category: r.category,
                total: r.total,
                count: r.count,
            })
            .collect())
    }

    pub(crate) async fn pg_delete_all_expenses(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM expenses")
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;
        Ok(result.rows_affected())
    }
}
