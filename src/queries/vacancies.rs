use hirelink_schema::VacancyAddDto;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::db::models::{Application, Vacancy};
use crate::error::HirelinkError;

pub async fn insert_vacancy(
    conn: &mut SqliteConnection,
    vacancy: &VacancyAddDto,
) -> Result<Vacancy, HirelinkError> {
    let row = sqlx::query_as::<_, Vacancy>(
        r#"
        INSERT INTO vacancies (title, compensation)
        VALUES (?, ?)
        RETURNING id, title, compensation
        "#,
    )
    .bind(&vacancy.title)
    .bind(vacancy.compensation)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn get_vacancy(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Vacancy>, HirelinkError> {
    let row = sqlx::query_as::<_, Vacancy>(
        "SELECT id, title, compensation FROM vacancies WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// Records that `resume_id` replied to `vacancy_id`. A second reply for the
/// same pair is a unique-constraint violation.
pub async fn reply_to_vacancy(
    conn: &mut SqliteConnection,
    resume_id: i64,
    vacancy_id: i64,
    cover_letter: Option<&str>,
) -> Result<Application, HirelinkError> {
    let row = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO vacancies_replies (resume_id, vacancy_id, cover_letter)
        VALUES (?, ?, ?)
        RETURNING resume_id, vacancy_id, cover_letter
        "#,
    )
    .bind(resume_id)
    .bind(vacancy_id)
    .bind(cover_letter)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

/// Creates `vacancy` and one application per resume id.
pub async fn add_vacancy_and_replies(
    conn: &mut SqliteConnection,
    vacancy: &VacancyAddDto,
    resume_ids: &[i64],
    cover_letter: Option<&str>,
) -> Result<(Vacancy, Vec<Application>), HirelinkError> {
    let vacancy = insert_vacancy(conn, vacancy).await?;
    let mut replies = Vec::with_capacity(resume_ids.len());
    for resume_id in resume_ids {
        replies.push(reply_to_vacancy(conn, *resume_id, vacancy.id, cover_letter).await?);
    }
    debug!(vacancy_id = vacancy.id, replies = replies.len(), "vacancy created with replies");
    Ok((vacancy, replies))
}

pub async fn list_applications(
    conn: &mut SqliteConnection,
    vacancy_id: i64,
) -> Result<Vec<Application>, HirelinkError> {
    let rows = sqlx::query_as::<_, Application>(
        r#"
        SELECT resume_id, vacancy_id, cover_letter
        FROM vacancies_replies
        WHERE vacancy_id = ?
        ORDER BY resume_id
        "#,
    )
    .bind(vacancy_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
