pub mod connection;

#[cfg(test)]
pub mod test_utils;

pub use connection::FileConnection;
