//! Repository implementations

mod user;
mod wallet;

pub use user::UserRepo;
pub use wallet::WalletRepo;
