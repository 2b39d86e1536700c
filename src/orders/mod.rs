//! Order lifecycle management

use crate::core::error::{AdminError, AdminResult};
use crate::core::StatusUpdater;
use crate::entities::{Order, OrderStatus};

/// Change an order's status on the backend, then mirror it locally
///
/// The local collection is only touched once the backend confirms the
/// change; a refusal or transport error leaves it as it was.
pub async fn change_status(
    orders: &mut [Order],
    updater: &dyn StatusUpdater,
    order_id: &str,
    status: OrderStatus,
) -> AdminResult<()> {
    let accepted = updater
        .update_status(order_id, status)
        .await
        .map_err(|e| AdminError::Mutation {
            id: order_id.to_string(),
            message: e.to_string(),
        })?;

    if !accepted {
        return Err(AdminError::Mutation {
            id: order_id.to_string(),
            message: format!("backend refused status '{}'", status),
        });
    }

    if let Some(order) = orders.iter_mut().find(|order| order.id == order_id) {
        tracing::info!(order_id, from = %order.status, to = %status, "Order status updated");
        order.status = status;
    }

    Ok(())
}

/// Count orders per status, in lifecycle order
pub fn status_counts(orders: &[Order]) -> Vec<(OrderStatus, usize)> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| {
            let count = orders.iter().filter(|order| order.status == status).count();
            (status, count)
        })
        .collect()
}
