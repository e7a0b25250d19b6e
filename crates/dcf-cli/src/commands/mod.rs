pub mod interactive;
pub mod sensitivity;
pub mod valuation;
