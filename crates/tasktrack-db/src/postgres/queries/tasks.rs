use chrono::{DateTime, Utc};

use tasktrack_core::id::new_id;
use tasktrack_core::task::{NewTask, Task};

use super::super::{pg_err, pg_not_found, PostgresDatabase};
use crate::DbError;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(r: TaskRow) -> Self {
        Task {
            id: r.id,
            title: r.title,
            completed: r.completed,
            created_at: r.created_at,
        }
    }
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_task(&self, input: &NewTask) -> Result<Task, DbError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (id, title, completed, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, title, completed, created_at",
        )
        .bind(new_id())
        .bind(&input.title)
        .bind(input.completed)
        .bind(input.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_tasks(&self) -> Result<Vec<Task>, DbError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, completed, created_at FROM tasks ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub(crate) async fn pg_delete_task(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;

        if result.rows_affected() == 0 {
            return Err(pg_not_found(&format!("task {id}")));
        }

        Ok(())
    }

    pub(crate) async fn pg_count_tasks(&self, completed: Option<bool>) -> Result<i64, DbError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE ($1::BOOLEAN IS NULL OR completed = $1)",
        )
        .bind(completed)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)
    }

    pub(crate) async fn pg_delete_all_tasks(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM tasks")
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;
        Ok(result.rows_affected())
    }
}
