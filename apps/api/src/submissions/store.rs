//! Answer Store and the user/test/question rows around it.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::answer::{QuestionRow, RawAnswer};
use crate::models::test::{PaymentStatus, TestRow};
use crate::models::user::UserRow;

pub const TEST_NAME: &str = "BIG_5";

/// Parameters for a new Test row.
pub struct NewTest<'a> {
    pub test_giver_name: &'a str,
    pub age: Option<i32>,
    pub gender: Option<&'a str>,
    pub user_id: Uuid,
    pub payment_status: PaymentStatus,
    pub payment_link: &'a str,
}

pub struct NewQuestion {
    pub test_name: String,
    pub question: String,
    pub question_number: i32,
}

/// Returns the user registered under `email`, creating it on first submission.
pub async fn find_or_create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    gender: Option<&str>,
    age: Option<i32>,
) -> Result<UserRow, sqlx::Error> {
    let existing = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some(user) = existing {
        return Ok(user);
    }

    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (name, email, gender, age)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(gender)
    .bind(age)
    .fetch_one(pool)
    .await
}

pub async fn fetch_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_test(pool: &PgPool, test: NewTest<'_>) -> Result<TestRow, sqlx::Error> {
    sqlx::query_as::<_, TestRow>(
        r#"
        INSERT INTO tests (test_giver_name, age, gender, test_name, user_id, payment_status, payment_link)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(test.test_giver_name)
    .bind(test.age)
    .bind(test.gender)
    .bind(TEST_NAME)
    .bind(test.user_id)
    .bind(test.payment_status.as_str())
    .bind(test.payment_link)
    .fetch_one(pool)
    .await
}

pub async fn fetch_test(pool: &PgPool, test_id: Uuid) -> Result<Option<TestRow>, sqlx::Error> {
    sqlx::query_as::<_, TestRow>("SELECT * FROM tests WHERE id = $1")
        .bind(test_id)
        .fetch_optional(pool)
        .await
}

/// Bulk-inserts one answer per `(question_id, raw_score)` pair.
pub async fn insert_answers(
    pool: &PgPool,
    user_id: Uuid,
    test_id: Uuid,
    answers: &[(Uuid, String)],
) -> Result<u64, sqlx::Error> {
    if answers.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO answers (user_id, test_id, question_id, raw_score) ");
    builder.push_values(answers, |mut row, (question_id, raw_score)| {
        row.push_bind(user_id)
            .push_bind(test_id)
            .push_bind(*question_id)
            .push_bind(raw_score);
    });

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// A test's answers joined with their question numbers, ordered by number.
pub async fn fetch_answers(pool: &PgPool, test_id: Uuid) -> Result<Vec<RawAnswer>, sqlx::Error> {
    sqlx::query_as::<_, RawAnswer>(
        r#"
        SELECT a.user_id, a.test_id, a.question_id, a.raw_score, q.question_number
        FROM answers a
        JOIN questions q ON q.id = a.question_id
        WHERE a.test_id = $1
        ORDER BY q.question_number
        "#,
    )
    .bind(test_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_questions(pool: &PgPool) -> Result<Vec<QuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRow>("SELECT * FROM questions ORDER BY test_name, question_number")
        .fetch_all(pool)
        .await
}

pub async fn insert_questions(pool: &PgPool, questions: &[NewQuestion]) -> Result<u64, sqlx::Error> {
    if questions.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO questions (test_name, question, question_number) ");
    builder.push_values(questions, |mut row, q| {
        row.push_bind(&q.test_name)
            .push_bind(&q.question)
            .push_bind(q.question_number);
    });

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}
