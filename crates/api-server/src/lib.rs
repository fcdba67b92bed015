pub mod auth;
pub mod rest;
pub mod server;
pub mod swagger;

pub use server::ApiServer;
pub use swagger::ApiDoc;
