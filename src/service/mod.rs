pub mod grading;
pub mod participant_tracker;
pub mod question_bank;
pub mod room_registry;
pub mod scoring;
pub mod session;
pub mod validation;
