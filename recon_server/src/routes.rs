//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Anything that waits on I/O (the database, the processor) must be
//! awaited, never blocked on.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use recon_engine::{
    traits::{NotificationVerifier, OrderStore, PaymentProcessor, TransactionIntent},
    CheckoutApi,
    ReconcileError,
    ReconciliationApi,
    StatusQueryApi,
    VerifiedNotification,
};
use serde_json::json;

use crate::{
    config::ServerOptions,
    data_objects::{JsonResponse, StatusQueryParams},
    errors::ServerError,
    helpers::is_json_content_type,
};

pub const NOTIFICATION_SUCCESS_MESSAGE: &str = "Payment status updated successfully";
pub const NOTIFICATION_IGNORED_MESSAGE: &str = "Notification acknowledged. No payment status change";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Notifications  ----------------------------------------------------
route!(payment_notification => Post "/callback" impl NotificationVerifier, OrderStore);
/// Route handler for the processor's notification webhook.
///
/// The raw body is passed to the reconciliation engine untouched, since the signature covers fields exactly as the
/// processor sent them. Every successful reconciliation, including a duplicate or stale notification, is answered
/// with 200 so that the processor stops redelivering it.
pub async fn payment_notification<V, S>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<ReconciliationApi<V, S>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    V: NotificationVerifier,
    S: OrderStore,
{
    trace!("💻️ Received payment notification ({} bytes)", body.len());
    if options.strict_content_type && !is_json_content_type(&req) {
        warn!("💻️ Rejecting notification with content type {:?}", req.headers().get("content-type"));
        return Err(ServerError::InvalidContentType);
    }
    match api.reconcile(&body).await {
        Ok(ack) => {
            debug!("💻️ Notification processed. {ack}");
            Ok(HttpResponse::Ok().json(JsonResponse::success(NOTIFICATION_SUCCESS_MESSAGE)))
        },
        Err(e @ ReconcileError::UnhandledStatus { .. }) if options.ack_unmapped_statuses => {
            info!("💻️ Acknowledging notification without a status change. {e}");
            Ok(HttpResponse::Ok().json(JsonResponse::success(NOTIFICATION_IGNORED_MESSAGE)))
        },
        Err(e) => {
            debug!("💻️ Notification failed. {e}");
            Err(e.into())
        },
    }
}

//----------------------------------------------   Status query  ----------------------------------------------------
route!(transaction_status => Get "/status" impl PaymentProcessor, NotificationVerifier, OrderStore);
/// Route handler for processor status lookups.
///
/// Returns the processor's record verbatim in `data`. With `sync=true`, the record is also applied to the stored
/// order, exactly as if the processor had sent it as a notification, and `data` becomes
/// `{"transaction": <record>, "reconciliation": <outcome>}`. A failed sync does not fail the lookup; the outcome
/// carries the error instead.
pub async fn transaction_status<P, V, S>(
    params: web::Query<StatusQueryParams>,
    query_api: web::Data<StatusQueryApi<P>>,
    recon_api: web::Data<ReconciliationApi<V, S>>,
) -> Result<HttpResponse, ServerError>
where
    P: PaymentProcessor,
    V: NotificationVerifier,
    S: OrderStore,
{
    let StatusQueryParams { order_id, sync } = params.into_inner();
    trace!("💻️ Received status query for order '{order_id}' (sync: {sync})");
    let snapshot = query_api.query(&order_id).await?;
    if !sync {
        return Ok(HttpResponse::Ok().json(JsonResponse::success_with_data(snapshot.into_value())));
    }
    let reconciliation = match VerifiedNotification::from_snapshot(&snapshot) {
        Some(verified) => match recon_api.reconcile_verified(verified).await {
            Ok(ack) => {
                info!("💻️ Status sync for order '{order_id}'. {ack}");
                json!({ "status": "success", "ack": ack })
            },
            Err(e) => {
                warn!("💻️ Status sync for order '{order_id}' failed. {e}");
                json!({ "status": "error", "message": e.to_string() })
            },
        },
        None => json!({ "status": "error", "message": "The processor's record has no transaction status" }),
    };
    let data = json!({ "transaction": snapshot.into_value(), "reconciliation": reconciliation });
    Ok(HttpResponse::Ok().json(JsonResponse::success_with_data(data)))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(create_transaction => Post "" impl PaymentProcessor, OrderStore);
/// Route handler for creating a new transaction. The body is a [`TransactionIntent`]. On success, `data` holds the
/// processor's `token` and `redirect_url`.
pub async fn create_transaction<P, S>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<CheckoutApi<P, S>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    P: PaymentProcessor,
    S: OrderStore,
{
    trace!("💻️ Received new transaction request");
    if options.strict_content_type && !is_json_content_type(&req) {
        return Err(ServerError::InvalidContentType);
    }
    let intent = serde_json::from_slice::<TransactionIntent>(&body).map_err(|e| {
        debug!("💻️ Could not deserialize transaction request. {e}");
        ServerError::InvalidRequestBody(e.to_string())
    })?;
    let token = api.create_transaction(intent).await?;
    let data = json!({ "token": token.token, "redirect_url": token.redirect_url });
    Ok(HttpResponse::Ok().json(JsonResponse::success_with_data(data)))
}

route!(order_by_id => Get "/orders/{order_id}" impl PaymentProcessor, OrderStore);
pub async fn order_by_id<P, S>(
    path: web::Path<String>,
    api: web::Data<CheckoutApi<P, S>>,
) -> Result<HttpResponse, ServerError>
where
    P: PaymentProcessor,
    S: OrderStore,
{
    let order_id = path.into_inner();
    trace!("💻️ Received order query for '{order_id}'");
    let order = api.fetch_order(&order_id).await?;
    let data = serde_json::to_value(&order).map_err(|e| ServerError::Unspecified(e.to_string()))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success_with_data(data)))
}
