pub(crate) mod init;
pub(crate) mod load;
pub(crate) mod search;
pub(crate) mod serve;
