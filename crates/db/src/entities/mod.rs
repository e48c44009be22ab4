//! Database entities.

pub mod enquiry;
pub mod order;
pub mod professional;

pub use enquiry::Entity as Enquiry;
pub use order::Entity as Order;
pub use professional::Entity as Professional;
