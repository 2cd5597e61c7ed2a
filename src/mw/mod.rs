pub mod request_mw;
pub mod session_mw;
