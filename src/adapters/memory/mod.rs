pub mod catalog_store;

#[allow(unused_imports)]
pub use catalog_store::InMemoryCatalogStore;
