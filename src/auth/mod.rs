pub mod gate;

pub use gate::{authenticate, AccessError, AccessGate, Session, StubAccessGate, LOGIN_FAILED_MESSAGE};
