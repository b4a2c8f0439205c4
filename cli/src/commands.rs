pub mod check;
pub mod session;
