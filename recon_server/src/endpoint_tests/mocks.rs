use mockall::mock;
use recon_engine::{
    db_types::{NewOrder, Order, OrderId, PaymentStatus},
    traits::{
        OrderStore,
        OrderStoreError,
        PaymentProcessor,
        ProcessorError,
        ProcessorStatusSnapshot,
        StatusUpdate,
        TransactionIntent,
        TransactionToken,
    },
};

mock! {
    pub Store {}
    impl OrderStore for Store {
        async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), OrderStoreError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn update_payment_status(&self, order_id: &OrderId, status: PaymentStatus) -> Result<StatusUpdate, OrderStoreError>;
    }
}

mock! {
    pub Processor {}
    impl PaymentProcessor for Processor {
        async fn transaction_status(&self, order_id: &OrderId) -> Result<ProcessorStatusSnapshot, ProcessorError>;
        async fn create_transaction(&self, intent: &TransactionIntent) -> Result<TransactionToken, ProcessorError>;
    }
}
