pub mod format;
pub mod storage;
