pub mod appointments;
pub mod claims;
pub mod codes;
pub mod collections;
pub mod health;
pub mod messages;
pub mod patients;
pub mod payment_plans;
pub mod registry;
pub mod settings;
pub mod statements;
pub mod transfer;
