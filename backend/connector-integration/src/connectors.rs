pub mod authorizenet;

pub use self::authorizenet::AuthorizeNetProcessor;
