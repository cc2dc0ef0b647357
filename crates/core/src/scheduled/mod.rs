//! Recurring scheduled payments and the engine that executes them.

mod engine;
mod engine_tests;
mod recurrence;
mod scheduled_model;
mod scheduled_service;
mod scheduled_traits;

// Re-export the public interface
pub use engine::PaymentEngine;
pub use recurrence::next_occurrence;
pub use scheduled_model::{
    EngineRunSummary, NewScheduledPayment, Recurrence, ScheduledPayment, ScheduledPaymentStatus,
};
pub use scheduled_service::ScheduledPaymentService;
pub use scheduled_traits::{
    PaymentEngineTrait, ScheduledPaymentRepositoryTrait, ScheduledPaymentServiceTrait,
};
