pub mod acquisition;
pub mod error;
pub mod ncei_client;
pub mod raw_record;
pub mod source;
