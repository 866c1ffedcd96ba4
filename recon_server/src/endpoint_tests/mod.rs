mod checkout;
mod mocks;
mod notifications;
mod status;
