pub mod apply;
pub mod check;
pub mod dispatch;
pub mod filter;
pub mod hostinfo;
pub mod message;
pub mod schema;
pub mod shared;
pub mod sort;
