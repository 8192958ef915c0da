pub mod csv_codec;
pub mod http;
pub mod markup;
pub mod persistence;
