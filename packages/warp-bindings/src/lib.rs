mod msg;
mod query;

pub use msg::WarpMsg;
pub use query::{GetVerifiedWarpMessageResponse, WarpMessage, WarpQuery};
