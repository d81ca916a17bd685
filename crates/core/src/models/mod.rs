pub mod dashboard;
pub mod expense;
pub mod goal;
pub mod investment;
pub mod ledger;
pub mod quote;
pub mod settings;
pub mod user;
