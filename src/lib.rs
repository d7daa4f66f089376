pub mod banner;
pub mod config;
pub mod consts;
pub mod curriculum;
pub mod gateway;
pub mod logging;
pub mod prompts;
pub mod relay;
pub mod request;
pub mod response;
pub mod server;
