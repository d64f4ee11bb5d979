pub mod app_state;
pub mod error;
pub mod participant;
pub mod question;
pub mod response;
pub mod room;
pub mod session;
