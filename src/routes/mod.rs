pub mod ad_account;
pub mod system;
