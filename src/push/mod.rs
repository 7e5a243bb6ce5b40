pub mod dispatcher;
pub mod transport;
pub mod upstream;
