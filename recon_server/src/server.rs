use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer, Scope};
use log::*;
use recon_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    traits::{NotificationVerifier, OrderStore, PaymentProcessor},
    CheckoutApi,
    ProcessorConfirmedVerifier,
    ReconciliationApi,
    SignatureVerifier,
    SqliteDatabase,
    StatusQueryApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::midtrans::MidtransProcessor,
    routes::{health, CreateTransactionRoute, OrderByIdRoute, PaymentNotificationRoute, TransactionStatusRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate().map_err(|e| {
        error!("🚀️ Refusing to start. {e}");
        e
    })?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let processor = MidtransProcessor::new(config.midtrans.clone())?;
    let hooks = audit_hooks();
    let handlers = EventHandlers::new(128, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, processor, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Every status change lands in the audit log.
fn audit_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_payment_status_changed(|ev| {
        Box::pin(async move {
            info!(
                target: "recon::audit",
                "📝️ Order {} payment status changed to {:?}. Notification: {}",
                ev.order.order_id,
                ev.payment_status(),
                ev.notification_payload
            );
        })
    });
    hooks
}

pub fn create_server_instance<S, P>(
    config: ServerConfig,
    db: S,
    processor: P,
    producers: EventProducers,
) -> Result<Server, ServerError>
where
    S: OrderStore + Clone + Send + 'static,
    P: PaymentProcessor + Clone + Send + 'static,
{
    config.validate()?;
    let retry_policy = config.retry_policy();
    let options = config.options;
    let server_key = config.midtrans.server_key.clone();
    if options.confirm_with_processor {
        info!("🔔️ Notifications will be confirmed with the processor before they are applied");
    }
    let srv = HttpServer::new(move || {
        let checkout_api = CheckoutApi::new(processor.clone(), db.clone());
        let status_api = StatusQueryApi::new(processor.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("recon::access_log"))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(status_api))
            .app_data(web::Data::new(options));
        let api_scope = if options.confirm_with_processor {
            let verifier = ProcessorConfirmedVerifier::new(server_key.clone(), processor.clone());
            let recon_api = ReconciliationApi::new(verifier, db.clone(), producers.clone())
                .with_retry_policy(retry_policy.clone());
            api_scope::<P, _, S>(recon_api)
        } else {
            let verifier = SignatureVerifier::new(server_key.clone());
            let recon_api = ReconciliationApi::new(verifier, db.clone(), producers.clone())
                .with_retry_policy(retry_policy.clone());
            api_scope::<P, _, S>(recon_api)
        };
        app.service(health).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// The `/api` routes. The notification verifier is a type parameter, so the scope is assembled once per verifier.
pub fn api_scope<P, V, S>(recon_api: ReconciliationApi<V, S>) -> Scope
where
    P: PaymentProcessor + 'static,
    V: NotificationVerifier + 'static,
    S: OrderStore + 'static,
{
    web::scope("/api")
        .app_data(web::Data::new(recon_api))
        .service(PaymentNotificationRoute::<V, S>::new())
        .service(TransactionStatusRoute::<P, V, S>::new())
        .service(OrderByIdRoute::<P, S>::new())
        .service(CreateTransactionRoute::<P, S>::new())
}
