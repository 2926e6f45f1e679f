use rusqlite::{params, Row};

use tasktrack_core::id::new_id;
use tasktrack_core::task::{NewTask, Task};

use super::super::{from_sql_time, to_sql_time, SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let created_at: String = row.get("created_at")?;
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        completed: row.get("completed")?,
        created_at: from_sql_time(3, &created_at)?,
    })
}

impl SqliteDatabase {
    pub fn create_task_sync(&self, input: &NewTask) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            let id = new_id();
            conn.execute(
                "INSERT INTO tasks (id, title, completed, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, input.title, input.completed, to_sql_time(&input.created_at)],
            )
            .to_db()?;

            conn.query_row(
                "SELECT id, title, completed, created_at FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .to_db()
        })
    }

    pub fn list_tasks_sync(&self) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, title, completed, created_at FROM tasks ORDER BY rowid ASC")
                .to_db()?;
            let tasks = stmt
                .query_map([], row_to_task)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(tasks)
        })
    }

    pub fn delete_task_sync(&self, id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute("DELETE FROM tasks WHERE id = ?1", params![id])
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }

    pub fn count_tasks_sync(&self, completed: Option<bool>) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            match completed {
                Some(flag) => conn.query_row(
                    "SELECT COUNT(*) FROM tasks WHERE completed = ?1",
                    params![flag],
                    |row| row.get(0),
                ),
                None => conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)),
            }
            .to_db()
        })
    }

    pub fn delete_all_tasks_sync(&self) -> Result<u64, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks", []).to_db()?;
            Ok(changed as u64)
        })
    }
}
