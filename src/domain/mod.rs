//! Domain model: the cart aggregate, the order materializer, and the
//! catalog entity with its category sequence counter.

pub mod cart;
pub mod order;
pub mod product;
