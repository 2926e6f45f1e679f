use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use tasktrack_core::expense::{CategoryTotal, Expense, MonthlySummary, NewExpense};
use tasktrack_core::id::new_id;

use super::super::{from_sql_time, to_sql_time, SqliteDatabase, SqliteResultExt};
use crate::DbError;

const EXPENSE_COLUMNS: &str = "id, title, amount, category, date";

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let date: String = row.get("date")?;
    Ok(Expense {
        id: row.get("id")?,
        title: row.get("title")?,
        amount: row.get("amount")?,
        category: row.get("category")?,
        date: from_sql_time(4, &date)?,
    })
}

impl SqliteDatabase {
    pub fn create_expense_sync(&self, input: &NewExpense) -> Result<Expense, DbError> {
        self.with_conn(|conn| {
            let id = new_id();
            conn.execute(
                "INSERT INTO expenses (id, title, amount, category, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id,
                    input.title,
                    input.amount,
                    input.category,
                    to_sql_time(&input.date),
                ],
            )
            .to_db()?;

            conn.query_row(
                &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
                params![id],
                row_to_expense,
            )
            .to_db()
        })
    }

    pub fn list_expenses_sync(&self) -> Result<Vec<Expense>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY date DESC, rowid DESC"
                ))
                .to_db()?;
            let expenses = stmt
                .query_map([], row_to_expense)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(expenses)
        })
    }

    pub fn delete_expense_sync(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute("DELETE FROM expenses WHERE id = ?1", params![id])
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("expense {id}")));
            }
            Ok(())
        })
    }

    pub fn count_expenses_sync(&self) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))
                .to_db()
        })
    }

    pub fn summarize_expenses_sync(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlySummary, DbError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COALESCE(SUM(amount), 0.0), COUNT(*) FROM expenses
                 WHERE date >= ?1 AND date < ?2",
                params![to_sql_time(&start), to_sql_time(&end)],
                |row| {
                    Ok(MonthlySummary {
                        total: row.get(0)?,
                        count: row.get(1)?,
                    })
                },
            )
            .to_db()
        })
    }

    pub fn expense_totals_by_category_sync(&self) -> Result<Vec<CategoryTotal>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT category, SUM(amount) AS total, COUNT(*) AS cnt FROM expenses
                     GROUP BY category ORDER BY total DESC, category ASC",
                )
                .to_db()?;
            let totals = stmt
                .query_map([], |row| {
                    Ok(CategoryTotal {
                        category: row.get(0)?,
                        total: row.get(1)?,
                        count: row.get(2)?,
                    })
                })
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(totals)
        })
    }

    pub fn delete_all_expenses_sync(&self) -> Result<u64, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM expenses", []).to_db()?;
            Ok(changed as u64)
        })
    }
}
