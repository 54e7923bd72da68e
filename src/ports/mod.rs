#[allow(unused_imports)]
pub mod catalog_store;
#[allow(unused_imports)]
pub mod payment_gateway;

#[allow(unused_imports)]
pub use catalog_store::*;
#[allow(unused_imports)]
pub use payment_gateway::*;
