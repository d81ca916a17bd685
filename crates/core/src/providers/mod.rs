pub mod registry;
pub mod traits;

// Exchange provider implementations
pub mod bse;
pub mod nse;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
