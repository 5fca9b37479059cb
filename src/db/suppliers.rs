use crate::models::{CreateSupplier, Supplier, UpdateSupplier};
use sqlx::PgPool;

pub async fn insert(pool: &PgPool, dto: &CreateSupplier) -> Result<Supplier, sqlx::Error> {
    sqlx::query_as::<_, Supplier>(
        r#"
        INSERT INTO supplier (name, cuit, cbu, payment_term)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, cuit, cbu, payment_term
        "#,
    )
    .bind(&dto.name)
    .bind(&dto.cuit)
    .bind(&dto.cbu)
    .bind(dto.payment_term)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Supplier>, sqlx::Error> {
    sqlx::query_as::<_, Supplier>(
        r#"
        SELECT id, name, cuit, cbu, payment_term
        FROM supplier
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Supplier>, sqlx::Error> {
    sqlx::query_as::<_, Supplier>(
        r#"
        SELECT id, name, cuit, cbu, payment_term
        FROM supplier
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Lookup by canonical CUIT, used by the OCR auto-match path.
pub async fn find_by_cuit(pool: &PgPool, cuit: &str) -> Result<Option<Supplier>, sqlx::Error> {
    sqlx::query_as::<_, Supplier>(
        r#"
        SELECT id, name, cuit, cbu, payment_term
        FROM supplier
        WHERE cuit = $1
        "#,
    )
    .bind(cuit)
    .fetch_optional(pool)
    .await
}

/// Partial update; NULL parameters keep the current column value.
pub async fn update(
    pool: &PgPool,
    id: i64,
    dto: &UpdateSupplier,
) -> Result<Option<Supplier>, sqlx::Error> {
    sqlx::query_as::<_, Supplier>(
        r#"
        UPDATE supplier
        SET name = COALESCE($2, name),
            cuit = COALESCE($3, cuit),
            cbu = COALESCE($4, cbu),
            payment_term = COALESCE($5, payment_term)
        WHERE id = $1
        RETURNING id, name, cuit, cbu, payment_term
        "#,
    )
    .bind(id)
    .bind(&dto.name)
    .bind(&dto.cuit)
    .bind(&dto.cbu)
    .bind(dto.payment_term)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM supplier WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
