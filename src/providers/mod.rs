pub mod privatbank;
pub mod util;

pub use privatbank::PrivatBankProvider;
