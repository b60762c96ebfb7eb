pub mod jwt;
pub mod password;
pub mod qr;
pub mod storage;
pub mod time;
pub mod token;

pub use jwt::*;
pub use password::*;
pub use time::*;
