pub mod init;
pub mod top;
