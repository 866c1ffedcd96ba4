use log::*;
use sqlx::SqliteConnection;

use crate::db_types::{NewOrder, Order, OrderId, PaymentStatus};

/// Inserts the order, returning `false` in the second parameter if an order with the same `order_id` already exists.
/// In that case the existing order is returned untouched.
pub async fn idempotent_insert(order: NewOrder, conn: &mut SqliteConnection) -> Result<(Order, bool), sqlx::Error> {
    let inserted: Option<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, gross_amount, payment_status)
            VALUES ($1, $2, $3)
            ON CONFLICT (order_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(order.order_id.as_str())
    .bind(order.gross_amount)
    .bind(order.payment_status)
    .fetch_optional(&mut *conn)
    .await?;
    match inserted {
        Some(order) => {
            debug!("🗃️ Order {} inserted with id {}", order.order_id, order.id);
            Ok((order, true))
        },
        None => {
            let existing = fetch_order_by_order_id(&order.order_id, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
            trace!("🗃️ Order {} already exists", existing.order_id);
            Ok((existing, false))
        },
    }
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Sets the payment status of the order, provided the order's current status does not rank higher than `status`
/// (see [`PaymentStatus::rank`]). The rank check and the write happen in a single statement.
///
/// Returns the updated order, or `None` if no row was written. That is the case both when the order does not exist
/// and when its current status outranks `status`.
pub async fn update_payment_status_if_not_stale(
    order_id: &OrderId,
    status: PaymentStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders
            SET payment_status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $2 AND (
                payment_status IS NULL OR
                CASE payment_status
                    WHEN 'pending' THEN $3
                    WHEN 'challenge' THEN $4
                    WHEN 'success' THEN $5
                    WHEN 'failed' THEN $6
                    ELSE $3
                END <= $7
            )
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(order_id.as_str())
    .bind(PaymentStatus::Pending.rank())
    .bind(PaymentStatus::Challenge.rank())
    .bind(PaymentStatus::Success.rank())
    .bind(PaymentStatus::Failed.rank())
    .bind(status.rank())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
