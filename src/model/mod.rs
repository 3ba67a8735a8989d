pub mod api;
pub mod operation;
pub mod parameter;
pub mod path;
pub mod request;
pub mod response;

pub use api::Api;
pub use operation::Operation;
pub use parameter::{ParamContext, Parameter};
pub use path::Path;
pub use request::{RawRequest, RawResponse};
pub use response::Response;
