pub mod payment_gateway;

#[allow(unused_imports)]
pub use payment_gateway::MockPaymentGateway;
