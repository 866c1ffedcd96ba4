pub mod notifications;
pub mod prepare_env;
