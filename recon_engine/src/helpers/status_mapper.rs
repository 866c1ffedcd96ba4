//! Translation of the processor's transaction and fraud status into the merchant's [`PaymentStatus`].
//!
//! [`map_status`] is the single place where this translation happens. It is a pure function: the result depends on
//! nothing but its two arguments.
use recon_common::{FraudStatus, TransactionStatus};

use crate::db_types::PaymentStatus;

/// The result of mapping a processor status.
///
/// `NoMapping` is a legitimate outcome: the processor sends statuses (refunds, authorisations, captures without a
/// fraud verdict) that do not correspond to any payment status change. Callers must decide explicitly what to do
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMapping {
    Mapped(PaymentStatus),
    NoMapping,
}

pub fn map_status(transaction_status: &TransactionStatus, fraud_status: Option<&FraudStatus>) -> StatusMapping {
    use PaymentStatus::*;
    use StatusMapping::*;
    match (transaction_status, fraud_status) {
        (TransactionStatus::Capture, Some(FraudStatus::Challenge)) => Mapped(Challenge),
        (TransactionStatus::Capture, Some(FraudStatus::Accept)) => Mapped(Success),
        (TransactionStatus::Capture, _) => NoMapping,
        (TransactionStatus::Settlement, _) => Mapped(Success),
        (TransactionStatus::Cancel | TransactionStatus::Deny | TransactionStatus::Expire, _) => Mapped(Failed),
        (TransactionStatus::Pending, _) => Mapped(Pending),
        (TransactionStatus::Other(_), _) => NoMapping,
    }
}
