//! Repositorio de estudiantes

use sqlx::PgPool;

use crate::models::student::Student;
use crate::utils::errors::AppResult;

pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todos los estudiantes, como datos de referencia para resolver
    /// nombres durante la validación
    pub async fn find_all(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students ORDER BY full_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Estudiantes sin un ride actualmente activo (ongoing o pending)
    pub async fn find_unassigned(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT s.* FROM students s
            WHERE NOT EXISTS (
                SELECT 1 FROM rides r
                WHERE r.student_id = s.id AND r.status IN ('ongoing', 'pending')
            )
            ORDER BY s.full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}
